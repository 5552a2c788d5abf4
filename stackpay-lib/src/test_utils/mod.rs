//! Test utilities for StackPay.
//!
//! This module provides testing infrastructure including:
//! - A mock wallet that deterministically succeeds, cancels or fails
//! - Hook recorders for checking which callbacks fired
//! - Fixtures for addresses, intents and transaction ids
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stackpay_lib::test_utils::{HookRecorder, MockBehavior, MockWallet, test_intent};
//!
//! let wallet = Arc::new(MockWallet::new().with_broadcast(MockBehavior::Cancel));
//! let facade = PaymentFacade::with_wallet(StackPayConfig::default(), wallet.clone());
//! facade.connect().await?;
//!
//! let recorder = HookRecorder::new();
//! let result = facade
//!     .initiate_payment(PaymentRequest::new(test_intent()).with_hooks(recorder.hooks()))
//!     .await;
//! assert_eq!(recorder.cancels(), 1);
//! ```

mod fixtures;
mod hooks;
mod mock_wallet;

pub use fixtures::{test_intent, test_tx_id, MAINNET_ADDRESS, VALID_ADDRESS};
pub use hooks::HookRecorder;
pub use mock_wallet::{MockBehavior, MockWallet};
