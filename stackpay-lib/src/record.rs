//! Transaction records kept after a payment is submitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount;
use crate::facade::Session;
use crate::{PaymentIntent, TransactionId};

/// Settlement state of a submitted payment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Broadcast, not yet confirmed.
    #[default]
    Pending,
    /// Confirmed on chain.
    Success,
    /// Aborted or dropped.
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A submitted payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Id reported by the wallet.
    pub tx_id: TransactionId,
    /// Payer address.
    pub sender: String,
    /// Merchant address.
    pub recipient: String,
    /// Amount in base units.
    pub amount: u64,
    /// When the payment was submitted.
    pub timestamp: DateTime<Utc>,
    /// Memo, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Settlement state.
    #[serde(default)]
    pub status: TransactionStatus,
}

impl TransactionRecord {
    /// Record a payment the wallet just broadcast.
    pub fn pending(session: &Session, intent: &PaymentIntent, tx_id: TransactionId) -> Self {
        Self {
            tx_id,
            sender: session.address().to_string(),
            recipient: intent.recipient.clone(),
            amount: intent.amount,
            timestamp: Utc::now(),
            memo: intent.memo().map(str::to_string),
            status: TransactionStatus::Pending,
        }
    }

    /// Update the settlement state.
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Amount in display units.
    pub fn display_amount(&self) -> Decimal {
        amount::to_display_units(self.amount)
    }
}
