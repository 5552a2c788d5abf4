//! Receipts command - show submitted payments

use anyhow::Result;
use colored::Colorize;
use stackpay_lib::amount;
use stackpay_lib::record::{TransactionRecord, TransactionStatus};
use std::path::Path;

use crate::storage::DemoStorage;
use crate::ui;

pub async fn run(storage_dir: &Path, id: Option<&str>, verbose: bool) -> Result<()> {
    ui::header("Payment Receipts");

    let storage = DemoStorage::new(storage_dir);
    let receipts = storage.list_receipts()?;

    if let Some(id) = id {
        let receipt = receipts
            .iter()
            .find(|r| r.tx_id.as_str() == id)
            .ok_or_else(|| anyhow::anyhow!("Receipt '{}' not found", id))?;
        show(receipt, true)?;
        return Ok(());
    }

    if receipts.is_empty() {
        ui::info("No receipts found");
        ui::info("Receipts will appear here after completing payments");
        return Ok(());
    }

    for receipt in &receipts {
        show(receipt, verbose)?;
    }

    ui::separator();
    ui::info(&format!("{} receipt(s)", receipts.len()));
    Ok(())
}

fn show(receipt: &TransactionRecord, verbose: bool) -> Result<()> {
    println!("\n{}", format!("Transaction: {}", receipt.tx_id).bold());
    ui::key_value(
        "  Amount",
        &format!(
            "{} ({} base units)",
            amount::format_display_units(receipt.amount),
            receipt.amount
        ),
    );
    ui::key_value("  Recipient", &receipt.recipient);
    ui::key_value(
        "  Timestamp",
        &receipt
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    );
    if let Some(memo) = &receipt.memo {
        ui::key_value("  Memo", memo);
    }

    let status = match receipt.status {
        TransactionStatus::Pending => "pending".yellow(),
        TransactionStatus::Success => "success".green(),
        TransactionStatus::Failed => "failed".red(),
    };
    println!("  {}: {}", "Status".cyan(), status);

    if verbose {
        ui::key_value("  Sender", &receipt.sender);
        ui::json(&serde_json::to_value(receipt)?);
    }
    Ok(())
}
