//! Config command - show the effective configuration

use anyhow::Result;
use stackpay_lib::StackPayConfig;
use std::path::Path;

use crate::storage::DemoStorage;
use crate::ui;

pub async fn run(storage_dir: &Path, verbose: bool) -> Result<()> {
    ui::header("StackPay Configuration");

    let storage = DemoStorage::new(storage_dir);
    if storage.load_config()?.is_none() {
        ui::info("No config.json found, using defaults and STACKPAY_* environment");
        ui::info("Run 'stackpay-demo init' to save a configuration");
    }

    let config = storage.effective_config()?;
    print(&config);

    if verbose {
        ui::separator();
        ui::json(&serde_json::to_value(&config)?);
    }

    Ok(())
}

/// Print the configuration as key/value lines
pub fn print(config: &StackPayConfig) {
    ui::separator();
    ui::key_value("App", &config.app_name);
    if let Some(icon) = &config.app_icon {
        ui::key_value("Icon", icon);
    }
    ui::key_value("Network", config.network.as_str());
    ui::key_value("API", config.network.api_url());
    ui::key_value("Contract", &config.contract_id());
    ui::key_value("Checkout", &config.checkout_base_url);
}
