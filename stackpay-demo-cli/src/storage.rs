//! JSON file storage for the demo
//!
//! Layout under the storage directory:
//! - `config.json`: the gateway configuration written by `init`
//! - `receipts.json`: every payment submitted through `pay`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stackpay_lib::record::TransactionRecord;
use stackpay_lib::StackPayConfig;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.json";
const RECEIPTS_FILE: &str = "receipts.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ReceiptLog {
    #[serde(default)]
    receipts: Vec<TransactionRecord>,
}

/// File-backed storage rooted at one directory
pub struct DemoStorage {
    dir: PathBuf,
}

impl DemoStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    fn receipts_path(&self) -> PathBuf {
        self.dir.join(RECEIPTS_FILE)
    }

    /// Load the saved configuration, if `init` has been run
    pub fn load_config(&self) -> Result<Option<StackPayConfig>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read configuration")?;
        let config: StackPayConfig =
            serde_json::from_str(&contents).context("Failed to parse configuration")?;
        Ok(Some(config))
    }

    /// Save the configuration
    pub fn save_config(&self, config: &StackPayConfig) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let contents =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        std::fs::write(self.config_path(), contents).context("Failed to write configuration")?;
        Ok(())
    }

    /// Saved configuration, or one built from `STACKPAY_*` environment variables
    pub fn effective_config(&self) -> Result<StackPayConfig> {
        let config = match self.load_config()? {
            Some(config) => config,
            None => StackPayConfig::from_env().context("Invalid STACKPAY_* environment")?,
        };
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", self.config_path().display()))?;
        Ok(config)
    }

    /// All stored receipts, oldest first
    pub fn list_receipts(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.load_receipts()?.receipts)
    }

    /// Append one receipt
    pub fn append_receipt(&self, record: TransactionRecord) -> Result<()> {
        let mut log = self.load_receipts()?;
        log.receipts.push(record);

        std::fs::create_dir_all(&self.dir)?;
        let contents =
            serde_json::to_string_pretty(&log).context("Failed to serialize receipts")?;
        std::fs::write(self.receipts_path(), contents).context("Failed to write receipts")?;
        Ok(())
    }

    fn load_receipts(&self) -> Result<ReceiptLog> {
        let path = self.receipts_path();
        if !path.exists() {
            return Ok(ReceiptLog::default());
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read receipts")?;
        serde_json::from_str(&contents).context("Failed to parse receipts")
    }
}
