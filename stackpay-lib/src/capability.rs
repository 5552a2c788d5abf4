//! Wallet capability traits.
//!
//! The facade never signs or broadcasts anything. It hands a fully described
//! request to a wallet implementation and waits for the user's decision:
//!
//! - [`WalletAuthorizer`] runs the "connect wallet" flow
//! - [`TransactionBroadcaster`] asks the user to approve a contract call
//!
//! Both report [`Outcome::Cancelled`] when the user dismisses the wallet's own
//! prompt, and an `Err` for anything else that went wrong. Callback-style
//! wallets can adapt to these traits with [`crate::callback::pending`].
//!
//! # Example
//!
//! ```ignore
//! use stackpay_lib::capability::*;
//!
//! struct BrowserWallet { /* ... */ }
//!
//! #[async_trait]
//! impl TransactionBroadcaster for BrowserWallet {
//!     async fn open_contract_call(&self, call: ContractCall) -> CapabilityResult<Outcome<TransactionId>> {
//!         // hand `call` to the extension, await its callback
//!     }
//! }
//! ```

pub use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clarity::ClarityValue;
use crate::config::{Network, StackPayConfig};
use crate::{PaymentIntent, TransactionId};

/// Gateway function every payment calls.
pub const PAYMENT_FUNCTION_NAME: &str = "process-payment";

/// Error reported by a wallet implementation.
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a wallet capability call.
pub type CapabilityResult<T> = std::result::Result<T, CapabilityError>;

/// How a user-facing wallet flow ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The user approved and the wallet produced a value.
    Finished(T),
    /// The user dismissed the prompt.
    Cancelled,
}

/// Application metadata shown by the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetails {
    /// Application name.
    pub name: String,
    /// Icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Identity returned by a successful wallet connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    /// The connected account's address.
    pub address: String,
    /// Wallet-specific profile data, kept opaque.
    #[serde(default)]
    pub profile: serde_json::Value,
}

impl UserData {
    /// Identity with an empty profile.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            profile: serde_json::Value::Null,
        }
    }
}

/// Input to the wallet-authorization flow.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthRequest {
    /// Who is asking.
    pub app: AppDetails,
    /// The identity from an earlier connection, if any.
    pub session: Option<UserData>,
}

/// Transaction anchoring preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// Let the wallet choose.
    #[default]
    Any,
    /// Only in an anchor block.
    OnChainOnly,
    /// Only in a microblock.
    OffChainOnly,
}

/// How the wallet treats asset movements not covered by post-conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostConditionMode {
    /// Allow transfers without explicit post-conditions.
    #[default]
    Allow,
    /// Abort on any uncovered transfer.
    Deny,
}

/// A fully described contract call for the wallet to sign and broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractCall {
    /// Target network.
    pub network: Network,
    /// Anchoring preference.
    pub anchor_mode: AnchorMode,
    /// Address that deployed the contract.
    pub contract_address: String,
    /// Contract name.
    pub contract_name: String,
    /// Function to call.
    pub function_name: String,
    /// Ordered, typed arguments.
    pub function_args: Vec<ClarityValue>,
    /// Post-condition policy.
    pub post_condition_mode: PostConditionMode,
    /// Who is asking.
    pub app: AppDetails,
}

impl ContractCall {
    /// The gateway payment call for `intent`.
    ///
    /// Arguments are `(recipient principal, amount uint, memo optional)`. The
    /// function has fixed arity so a missing memo is passed as `none`.
    pub fn payment(config: &StackPayConfig, intent: &PaymentIntent) -> Self {
        Self {
            network: config.network,
            anchor_mode: AnchorMode::Any,
            contract_address: config.contract_address.clone(),
            contract_name: config.contract_name.clone(),
            function_name: PAYMENT_FUNCTION_NAME.to_string(),
            function_args: vec![
                ClarityValue::principal(&intent.recipient),
                ClarityValue::uint(intent.amount),
                ClarityValue::optional_string_utf8(intent.memo()),
            ],
            post_condition_mode: PostConditionMode::Allow,
            app: config.app_details(),
        }
    }

    /// Fully qualified contract identifier.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }
}

/// Runs the wallet's connect flow.
#[async_trait]
pub trait WalletAuthorizer: Send + Sync {
    /// Ask the user to authorize this application.
    async fn authenticate(&self, request: &AuthRequest) -> CapabilityResult<Outcome<UserData>>;
}

/// Asks the wallet to sign and broadcast contract calls.
#[async_trait]
pub trait TransactionBroadcaster: Send + Sync {
    /// Present `call` for approval and broadcast it.
    async fn open_contract_call(
        &self,
        call: ContractCall,
    ) -> CapabilityResult<Outcome<TransactionId>>;
}

/// A wallet providing both capabilities.
pub trait Wallet: WalletAuthorizer + TransactionBroadcaster {}

impl<T: WalletAuthorizer + TransactionBroadcaster> Wallet for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::VALID_ADDRESS;

    #[test]
    fn test_payment_call_with_memo() {
        let config = StackPayConfig::default();
        let intent = PaymentIntent::new(VALID_ADDRESS, 1_000_000).with_memo("Order #1");
        let call = ContractCall::payment(&config, &intent);

        assert_eq!(call.function_name, "process-payment");
        assert_eq!(call.network, Network::Testnet);
        assert_eq!(call.anchor_mode, AnchorMode::Any);
        assert_eq!(call.post_condition_mode, PostConditionMode::Allow);
        assert_eq!(
            call.function_args,
            vec![
                ClarityValue::Principal(VALID_ADDRESS.to_string()),
                ClarityValue::UInt(1_000_000),
                ClarityValue::StringUtf8("Order #1".to_string()),
            ]
        );
        assert_eq!(call.contract_id(), config.contract_id());
    }

    #[test]
    fn test_payment_call_without_memo_passes_none() {
        let config = StackPayConfig::default();
        let intent = PaymentIntent::new(VALID_ADDRESS, 5);
        let call = ContractCall::payment(&config, &intent);

        assert_eq!(call.function_args.len(), 3);
        assert_eq!(call.function_args[2], ClarityValue::None);
    }
}
