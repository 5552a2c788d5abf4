//! Init command - write the gateway configuration

use anyhow::{Context, Result};
use stackpay_lib::{Network, StackPayConfig};
use std::path::Path;

use crate::storage::DemoStorage;
use crate::ui;

/// Fields given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub app_name: Option<String>,
    pub network: Option<String>,
    pub contract_address: Option<String>,
    pub contract_name: Option<String>,
    pub checkout_url: Option<String>,
}

impl Overrides {
    /// Apply on top of `config` and validate the result
    pub fn apply(self, mut config: StackPayConfig) -> Result<StackPayConfig> {
        if let Some(name) = self.app_name {
            config = config.with_app_name(name);
        }
        if let Some(network) = self.network {
            let network: Network = network.parse()?;
            config = config.with_network(network);
        }
        if let Some(address) = self.contract_address {
            config.contract_address = address;
        }
        if let Some(name) = self.contract_name {
            config.contract_name = name;
        }
        if let Some(url) = self.checkout_url {
            config = config.with_checkout_base_url(url);
        }

        config.validate().context("Configuration rejected")?;
        Ok(config)
    }
}

pub async fn run(storage_dir: &Path, overrides: Overrides, verbose: bool) -> Result<()> {
    ui::header("Initialize StackPay");

    let storage = DemoStorage::new(storage_dir);
    let existing = storage.load_config()?;
    let updating = existing.is_some();
    let base = match existing {
        Some(config) => config,
        None => StackPayConfig::from_env().context("Invalid STACKPAY_* environment")?,
    };

    let config = overrides.apply(base)?;
    storage.save_config(&config)?;

    if updating {
        ui::success("Configuration updated");
    } else {
        ui::success("Configuration created");
    }
    if verbose {
        ui::key_value("File", &storage.config_path().display().to_string());
    }
    super::config::print(&config);

    if config.network == Network::Mainnet {
        ui::warning("Mainnet selected: payments move real funds");
    }

    Ok(())
}
