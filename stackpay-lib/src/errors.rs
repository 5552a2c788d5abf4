//! Error types for StackPay operations.
//!
//! Validation failures are always raised before any wallet interaction.
//! Failures reported by the injected wallet are wrapped into
//! [`StackPayError::ExternalCapability`] so callers only ever see this type.

use std::fmt;
use thiserror::Error;

/// Error codes for FFI and host-application integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StackPayErrorCode {
    /// Recipient address failed the shape check
    InvalidRecipient = 1000,
    /// Amount is zero, negative or out of range
    InvalidAmount = 1001,
    /// Configuration field is invalid
    InvalidConfig = 1002,
    /// No wallet session
    NotConnected = 2000,
    /// User dismissed the wallet flow
    UserCancelled = 3000,
    /// Wallet capability failed
    ExternalCapability = 4000,
}

/// The wallet flow that was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelledFlow {
    /// The wallet authorization prompt.
    WalletConnection,
    /// The transaction approval prompt.
    Transaction,
}

impl fmt::Display for CancelledFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletConnection => write!(f, "wallet connection"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}

/// Error type for StackPay operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackPayError {
    /// Recipient is not a well-formed address.
    #[error("invalid recipient address: {0:?}")]
    InvalidRecipient(String),

    /// Amount violates the positive base-unit invariant.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A payment was attempted without a wallet session.
    #[error("wallet not connected, call connect() first")]
    NotConnected,

    /// The user dismissed the wallet's own prompt.
    #[error("{flow} cancelled by user")]
    UserCancelled {
        /// Which flow was dismissed
        flow: CancelledFlow,
    },

    /// The injected wallet capability failed.
    #[error("wallet capability failed: {0}")]
    ExternalCapability(String),

    /// Invalid configuration value.
    #[error("invalid {field}: {reason}")]
    InvalidConfig {
        /// Configuration field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl StackPayError {
    /// Get the error code for FFI/host integration.
    pub fn code(&self) -> StackPayErrorCode {
        match self {
            Self::InvalidRecipient(_) => StackPayErrorCode::InvalidRecipient,
            Self::InvalidAmount(_) => StackPayErrorCode::InvalidAmount,
            Self::NotConnected => StackPayErrorCode::NotConnected,
            Self::UserCancelled { .. } => StackPayErrorCode::UserCancelled,
            Self::ExternalCapability(_) => StackPayErrorCode::ExternalCapability,
            Self::InvalidConfig { .. } => StackPayErrorCode::InvalidConfig,
        }
    }

    /// Returns true for failures detected before any wallet interaction.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecipient(_)
                | Self::InvalidAmount(_)
                | Self::NotConnected
                | Self::InvalidConfig { .. }
        )
    }

    /// Returns true if the user dismissed a wallet prompt.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::UserCancelled { .. })
    }

    /// Wrap any failure reported by the wallet capability.
    pub fn external(err: impl fmt::Display) -> Self {
        Self::ExternalCapability(err.to_string())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn cancelled(flow: CancelledFlow) -> Self {
        Self::UserCancelled { flow }
    }
}
