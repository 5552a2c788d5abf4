//! Bridge from callback-style wallets to futures.
//!
//! Browser and mobile wallets usually report through `onFinish` / `onCancel`
//! callbacks. [`pending`] returns a cloneable [`Completer`] to hand to those
//! callbacks and a [`Pending`] future to await in a capability implementation.
//!
//! ```
//! use stackpay_lib::callback::pending;
//! use stackpay_lib::capability::Outcome;
//!
//! # tokio_test_block_on(async {
//! let (completer, pending) = pending::<String>();
//! let on_cancel = completer.clone();
//! std::thread::spawn(move || {
//!     completer.finish("0xabc".to_string());
//!     on_cancel.cancel();
//! });
//! assert_eq!(pending.wait().await.unwrap(), Outcome::Finished("0xabc".to_string()));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::capability::{CapabilityError, CapabilityResult, Outcome};

type Slot<T> = Arc<Mutex<Option<oneshot::Sender<CapabilityResult<Outcome<T>>>>>>;

/// Create a linked completer / future pair.
pub fn pending<T>() -> (Completer<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Completer {
            slot: Arc::new(Mutex::new(Some(tx))),
        },
        Pending { rx },
    )
}

/// Reports the outcome of a wallet flow.
///
/// Only the first report is delivered; later ones return `false`.
pub struct Completer<T> {
    slot: Slot<T>,
}

impl<T> Clone for Completer<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Completer<T> {
    /// The user approved and the wallet produced `value`.
    pub fn finish(&self, value: T) -> bool {
        self.send(Ok(Outcome::Finished(value)))
    }

    /// The user dismissed the prompt.
    pub fn cancel(&self) -> bool {
        self.send(Ok(Outcome::Cancelled))
    }

    /// The wallet failed.
    pub fn fail(&self, err: impl Into<CapabilityError>) -> bool {
        self.send(Err(err.into()))
    }

    /// Returns true once an outcome was reported.
    pub fn is_completed(&self) -> bool {
        self.lock().is_none()
    }

    fn send(&self, result: CapabilityResult<Outcome<T>>) -> bool {
        match self.lock().take() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<CapabilityResult<Outcome<T>>>>> {
        // A panicking callback cannot leave the slot half-written.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The future side of [`pending`].
pub struct Pending<T> {
    rx: oneshot::Receiver<CapabilityResult<Outcome<T>>>,
}

impl<T> Pending<T> {
    /// Wait for the wallet to report.
    ///
    /// If every completer is dropped without reporting, resolves to an error.
    pub async fn wait(self) -> CapabilityResult<Outcome<T>> {
        self.rx
            .await
            .unwrap_or_else(|_| Err("wallet flow ended without reporting an outcome".into()))
    }
}
