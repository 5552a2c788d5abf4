//! Link command - build a shareable checkout link

use anyhow::{Context, Result};
use stackpay_lib::amount;
use stackpay_lib::link::{build_payment_link, PaymentLinkOptions};
use stackpay_lib::{PaymentIntent, StackPayConfig};
use std::path::Path;

use super::convert::display_to_base;
use crate::storage::DemoStorage;
use crate::ui;

/// Arguments of the `link` command
#[derive(Debug)]
pub struct LinkArgs {
    pub recipient: String,
    pub amount: String,
    pub memo: Option<String>,
    pub redirect_url: Option<String>,
    pub cancel_url: Option<String>,
    pub base_units: bool,
    pub qr: bool,
}

impl LinkArgs {
    /// Options for the link builder
    pub fn to_options(&self) -> Result<PaymentLinkOptions> {
        let base = if self.base_units {
            self.amount
                .trim()
                .parse::<u64>()
                .with_context(|| format!("'{}' is not a base-unit amount", self.amount))?
        } else {
            display_to_base(&self.amount)?
        };

        let mut intent = PaymentIntent::new(self.recipient.trim(), base);
        if let Some(memo) = &self.memo {
            intent = intent.with_memo(memo.clone());
        }

        let mut options = PaymentLinkOptions::new(intent);
        if let Some(url) = &self.redirect_url {
            options = options.with_redirect_url(url.clone());
        }
        if let Some(url) = &self.cancel_url {
            options = options.with_cancel_url(url.clone());
        }
        Ok(options)
    }
}

/// Checkout link on the configured base URL
pub fn checkout_link(config: &StackPayConfig, options: &PaymentLinkOptions) -> Result<String> {
    let link = build_payment_link(&config.checkout_base_url, options)
        .context("Cannot build payment link")?;
    Ok(link.into())
}

pub async fn run(storage_dir: &Path, args: LinkArgs, verbose: bool) -> Result<()> {
    ui::header("Payment Link");

    let config = DemoStorage::new(storage_dir).effective_config()?;
    let options = args.to_options()?;

    let link = checkout_link(&config, &options)?;

    ui::key_value("Recipient", &options.intent.recipient);
    ui::key_value(
        "Amount",
        &format!(
            "{} ({} base units)",
            amount::format_display_units(options.intent.amount),
            options.intent.amount
        ),
    );
    if let Some(memo) = options.intent.memo() {
        ui::key_value("Memo", memo);
    }
    if verbose {
        if let Some(url) = &options.redirect_url {
            ui::key_value("Redirect", url);
        }
        if let Some(url) = &options.cancel_url {
            ui::key_value("Cancel", url);
        }
    }
    ui::separator();
    println!("{}", link);

    if args.qr {
        ui::qr_code(&link)?;
        ui::info("Scan this QR code to open checkout");
    }

    Ok(())
}
