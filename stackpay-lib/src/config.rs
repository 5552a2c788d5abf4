//! Gateway configuration.
//!
//! # Environment Variables
//!
//! [`StackPayConfig::from_env`] overlays the defaults with:
//!
//! - `STACKPAY_APP_NAME` - Application name shown in the wallet prompt
//! - `STACKPAY_NETWORK` - Network name: `mainnet` or `testnet`
//! - `STACKPAY_CONTRACT_ADDRESS` - Address that deployed the gateway contract
//! - `STACKPAY_CONTRACT_NAME` - Gateway contract name
//! - `STACKPAY_CHECKOUT_URL` - Base URL of the hosted checkout page
//!
//! # Example
//!
//! ```
//! use stackpay_lib::config::{Network, StackPayConfig};
//!
//! let config = StackPayConfig::default().with_network(Network::Mainnet);
//! assert_eq!(config.contract_name, "stackpay-gateway");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::address;
use crate::capability::AppDetails;
use crate::{Result, StackPayError};

/// Default application name.
pub const DEFAULT_APP_NAME: &str = "StackPay";
/// Address that deployed the gateway contract on testnet.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
/// Gateway contract name.
pub const DEFAULT_CONTRACT_NAME: &str = "stackpay-gateway";
/// Hosted checkout page.
pub const DEFAULT_CHECKOUT_BASE_URL: &str = "https://stackpay-app-testnet.com";

const MAX_CONTRACT_NAME_LEN: usize = 40;

/// Network selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network.
    Mainnet,
    /// Public test network.
    #[default]
    Testnet,
}

impl Network {
    /// Get the network name as used by most APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }

    /// Address version marker for this network.
    pub fn address_prefix(&self) -> &'static str {
        match self {
            Self::Mainnet => "SP",
            Self::Testnet => "ST",
        }
    }

    /// Public API node for this network.
    pub fn api_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.mainnet.hiro.so",
            Self::Testnet => "https://api.testnet.hiro.so",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = StackPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            other => Err(StackPayError::invalid_config(
                "network",
                format!("unknown network {other:?}, expected mainnet or testnet"),
            )),
        }
    }
}

/// Facade configuration.
///
/// Immutable once handed to a [`PaymentFacade`](crate::PaymentFacade).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackPayConfig {
    /// Application name shown by the wallet.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Application icon URL shown by the wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_icon: Option<String>,

    /// Network payments are broadcast to.
    #[serde(default)]
    pub network: Network,

    /// Address that deployed the gateway contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// Gateway contract name.
    #[serde(default = "default_contract_name")]
    pub contract_name: String,

    /// Base URL payment links are built on.
    #[serde(default = "default_checkout_base_url")]
    pub checkout_base_url: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

fn default_contract_name() -> String {
    DEFAULT_CONTRACT_NAME.to_string()
}

fn default_checkout_base_url() -> String {
    DEFAULT_CHECKOUT_BASE_URL.to_string()
}

impl Default for StackPayConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_icon: None,
            network: Network::default(),
            contract_address: default_contract_address(),
            contract_name: default_contract_name(),
            checkout_base_url: default_checkout_base_url(),
        }
    }
}

impl StackPayConfig {
    /// Set the application name.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the application icon URL.
    pub fn with_app_icon(mut self, icon: impl Into<String>) -> Self {
        self.app_icon = Some(icon.into());
        self
    }

    /// Set the network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the contract coordinates.
    pub fn with_contract(
        mut self,
        address: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.contract_address = address.into();
        self.contract_name = name.into();
        self
    }

    /// Set the checkout base URL.
    pub fn with_checkout_base_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_base_url = url.into();
        self
    }

    /// Load configuration from environment variables on top of the defaults.
    ///
    /// Unset variables keep their default. The result is validated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(name) = lookup("STACKPAY_APP_NAME") {
            config.app_name = name;
        }
        if let Some(network) = lookup("STACKPAY_NETWORK") {
            config.network = network.parse()?;
        }
        if let Some(address) = lookup("STACKPAY_CONTRACT_ADDRESS") {
            config.contract_address = address;
        }
        if let Some(name) = lookup("STACKPAY_CONTRACT_NAME") {
            config.contract_name = name;
        }
        if let Some(url) = lookup("STACKPAY_CHECKOUT_URL") {
            config.checkout_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(StackPayError::invalid_config(
                "app_name",
                "must not be empty",
            ));
        }

        if !address::is_valid_address(&self.contract_address) {
            return Err(StackPayError::invalid_config(
                "contract_address",
                format!("{:?} is not a valid address", self.contract_address),
            ));
        }

        if !is_valid_contract_name(&self.contract_name) {
            return Err(StackPayError::invalid_config(
                "contract_name",
                format!("{:?} is not a valid contract name", self.contract_name),
            ));
        }

        match url::Url::parse(&self.checkout_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
            Ok(url) => Err(StackPayError::invalid_config(
                "checkout_base_url",
                format!("unsupported scheme {:?}", url.scheme()),
            )),
            Err(e) => Err(StackPayError::invalid_config(
                "checkout_base_url",
                e.to_string(),
            )),
        }
    }

    /// Fully qualified contract identifier, `address.name`.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }

    /// Metadata the wallet shows when asking the user for approval.
    pub fn app_details(&self) -> AppDetails {
        AppDetails {
            name: self.app_name.clone(),
            icon: self.app_icon.clone(),
        }
    }
}

fn is_valid_contract_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    name.len() <= MAX_CONTRACT_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
