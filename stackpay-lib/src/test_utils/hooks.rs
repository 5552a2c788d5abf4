//! Recorders for payment and checkout hooks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::facade::PaymentHooks;
use crate::form::CheckoutHooks;
use crate::{StackPayError, TransactionId};

/// Collects every hook invocation.
///
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct HookRecorder {
    successes: Arc<Mutex<Vec<TransactionId>>>,
    errors: Arc<Mutex<Vec<StackPayError>>>,
    cancels: Arc<AtomicUsize>,
}

impl HookRecorder {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Facade hooks writing into this recorder.
    pub fn hooks(&self) -> PaymentHooks {
        let successes = Arc::clone(&self.successes);
        let errors = Arc::clone(&self.errors);
        let cancels = Arc::clone(&self.cancels);
        PaymentHooks::new()
            .on_success(move |tx| successes.lock().unwrap().push(tx.clone()))
            .on_error(move |err| errors.lock().unwrap().push(err.clone()))
            .on_cancel(move || {
                cancels.fetch_add(1, Ordering::SeqCst);
            })
    }

    /// Checkout form hooks writing into this recorder.
    pub fn checkout_hooks(&self) -> CheckoutHooks {
        let successes = Arc::clone(&self.successes);
        let errors = Arc::clone(&self.errors);
        CheckoutHooks::new()
            .on_success(move |tx| successes.lock().unwrap().push(tx.clone()))
            .on_error(move |err| errors.lock().unwrap().push(err.clone()))
    }

    /// Transaction ids passed to `on_success`.
    pub fn successes(&self) -> Vec<TransactionId> {
        self.successes.lock().unwrap().clone()
    }

    /// Errors passed to `on_error`.
    pub fn errors(&self) -> Vec<StackPayError> {
        self.errors.lock().unwrap().clone()
    }

    /// Number of `on_cancel` calls.
    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Total hook invocations of any kind.
    pub fn total(&self) -> usize {
        self.successes.lock().unwrap().len() + self.errors.lock().unwrap().len() + self.cancels()
    }
}
