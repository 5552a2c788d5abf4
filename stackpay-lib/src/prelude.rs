//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use stackpay_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Core types: `PaymentIntent`, `TransactionId`, `StackPayConfig`, `Network`
//! - Error types: `StackPayError`, `StackPayErrorCode`, `Result`
//! - Facade: `PaymentFacade`, `PaymentRequest`, `PaymentHooks`, `Session`
//! - Capability traits: `WalletAuthorizer`, `TransactionBroadcaster`, `Wallet`
//! - Links, unit conversion, the checkout form and transaction records

// Core types
pub use crate::config::{Network, StackPayConfig};
pub use crate::{PaymentIntent, TransactionId};

// Error handling
pub use crate::errors::{CancelledFlow, StackPayError, StackPayErrorCode};
pub use crate::Result;

// Facade
pub use crate::facade::{PaymentFacade, PaymentHooks, PaymentOutcome, PaymentRequest, Session};

// Capabilities
pub use crate::callback::{pending, Completer, Pending};
pub use crate::capability::{
    async_trait, AppDetails, AuthRequest, CapabilityError, CapabilityResult, ContractCall,
    Outcome, TransactionBroadcaster, UserData, Wallet, WalletAuthorizer,
};
pub use crate::clarity::ClarityValue;

// Links and amounts
pub use crate::address::is_valid_address;
pub use crate::amount::{to_base_units, to_display_units};
pub use crate::link::{build_payment_link, parse_payment_link, PaymentLinkOptions};

// Checkout form
pub use crate::form::{CheckoutHooks, FormValues, PaymentForm, SubmitOutcome};

// Records
pub use crate::record::{TransactionRecord, TransactionStatus};
