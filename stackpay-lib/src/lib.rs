//! StackPay library.
//!
//! This crate does not sign or broadcast anything itself. Wallet authorization
//! and contract-call broadcast are delegated to callers through trait-based
//! dependency injection (see [`capability`]).
//!
//! # Features
//!
//! - **Payment facade**: connect a wallet once, then submit payments to the
//!   StackPay gateway contract
//! - **Payment links**: shareable checkout URLs encoding a payment intent
//! - **Unit conversion**: exact base-unit / display-unit arithmetic
//! - **Checkout form**: headless form state with field validation and a busy flag
//!
//! # Example
//!
//! ```ignore
//! use stackpay_lib::prelude::*;
//!
//! let facade = PaymentFacade::with_wallet(StackPayConfig::default(), wallet);
//! facade.connect().await?;
//!
//! let intent = PaymentIntent::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM", 1_000_000)
//!     .with_memo("Order #1");
//! let tx_id = facade.initiate_payment(intent.into()).await?;
//! println!("submitted {tx_id}");
//! ```

use serde::{Deserialize, Serialize};

pub mod address;
pub mod amount;
pub mod callback;
pub mod capability;
pub mod clarity;
pub mod config;
pub mod errors;
pub mod facade;
pub mod form;
pub mod link;
pub mod prelude;
pub mod record;

/// Test utilities for payment testing.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Network, StackPayConfig};
pub use errors::{StackPayError, StackPayErrorCode};
pub use facade::{PaymentFacade, PaymentHooks, PaymentRequest, Session};

/// Common result alias for StackPay operations.
pub type Result<T> = std::result::Result<T, StackPayError>;

/// Identifier of a broadcast transaction, as reported by the wallet.
///
/// # Example
///
/// ```
/// use stackpay_lib::TransactionId;
///
/// let tx: TransactionId = "0xabc123".into();
/// assert_eq!(tx.as_str(), "0xabc123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Create a new transaction id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the transaction id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment to a StackPay merchant.
///
/// `amount` is expressed in base units (10^8 per display unit). A memo that is
/// empty is treated as absent everywhere it is encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Merchant address; doubles as the merchant's credential.
    pub recipient: String,
    /// Amount in base units.
    pub amount: u64,
    /// Optional short note attached to the payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl PaymentIntent {
    /// Create an intent without a memo.
    pub fn new(recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            recipient: recipient.into(),
            amount,
            memo: None,
        }
    }

    /// Attach a memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// The memo, if one was supplied and is non-empty.
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref().filter(|memo| !memo.is_empty())
    }

    /// Check the intent's invariants: a well-formed recipient and a positive amount.
    ///
    /// The recipient is checked first.
    pub fn validate(&self) -> Result<()> {
        address::ensure_valid_address(&self.recipient)?;
        if self.amount == 0 {
            return Err(StackPayError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
