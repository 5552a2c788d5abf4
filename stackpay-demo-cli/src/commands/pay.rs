//! Pay command - run the checkout form against the terminal wallet

use anyhow::{Context, Result};
use stackpay_lib::address::network_of;
use stackpay_lib::amount;
use stackpay_lib::form::{BusyHandle, CheckoutHooks, FormValues, PaymentForm, SubmitOutcome};
use stackpay_lib::link::parse_payment_link;
use stackpay_lib::record::TransactionRecord;
use stackpay_lib::PaymentFacade;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::DemoStorage;
use crate::ui;
use crate::wallet::PromptWallet;

pub async fn run(
    storage_dir: &Path,
    recipient: Option<String>,
    amount: Option<String>,
    memo: Option<String>,
    link: Option<String>,
    verbose: bool,
) -> Result<()> {
    ui::header("StackPay Checkout");

    if !console::Term::stdout().is_term() {
        anyhow::bail!("pay needs an interactive terminal to talk to the wallet");
    }

    let storage = DemoStorage::new(storage_dir);
    let config = storage.effective_config()?;

    let mut values = match link {
        Some(link) => prefill_from_link(&link)?,
        None => FormValues::default(),
    };
    if let Some(recipient) = recipient {
        values.recipient = recipient;
    }
    if let Some(amount) = amount {
        values.amount = amount;
    }
    if let Some(memo) = memo {
        values.memo = memo;
    }

    let progress = ui::idle_spinner("Waiting for the wallet...");
    let facade = PaymentFacade::with_wallet(
        config.clone(),
        Arc::new(PromptWallet::new(progress.clone())),
    );

    let session = facade.connect().await.context("Wallet connection failed")?;
    ui::success(&format!("Connected as {}", session.address()));
    if network_of(session.address()) != Some(config.network) {
        ui::warning(&format!(
            "This address does not belong to {}; the wallet may reject the call",
            config.network
        ));
    }

    let hooks = CheckoutHooks::new()
        .on_success(|tx_id| ui::success(&format!("Payment submitted: {}", tx_id)))
        .on_error(move |err| {
            if err.is_cancellation() {
                tracing::debug!(code = ?err.code(), "payment cancelled");
            } else if verbose {
                ui::error(&format!("Gateway reported: {} ({:?})", err, err.code()));
            }
        });

    let mut form = PaymentForm::with_values(values);
    loop {
        fill_missing(&mut form)?;

        let watcher = spawn_spinner(form.busy_handle(), progress.clone());
        let result = form.submit(&facade, &hooks).await;
        watcher.abort();
        progress.disable_steady_tick();
        progress.finish_and_clear();
        progress.reset();

        match result.context("Payment failed")? {
            SubmitOutcome::Invalid(errors) => {
                if let Some(message) = &errors.recipient {
                    ui::warning(&format!("Recipient: {}", message));
                }
                if let Some(message) = &errors.amount {
                    ui::warning(&format!("Amount: {}", message));
                }
                if !ui::confirm("Edit and try again?", true)? {
                    ui::info("Payment abandoned");
                    return Ok(());
                }
            }
            SubmitOutcome::Submitted { tx_id, intent } => {
                storage.append_receipt(TransactionRecord::pending(&session, &intent, tx_id))?;

                ui::info("Receipt saved; run `stackpay-demo receipts` to view it");
                return Ok(());
            }
        }
    }
}

fn prefill_from_link(link: &str) -> Result<FormValues> {
    let options = parse_payment_link(link).context("Not a checkout link")?;
    Ok(FormValues {
        amount: amount::format_display_units(options.intent.amount),
        memo: options.intent.memo().unwrap_or_default().to_string(),
        recipient: options.intent.recipient,
    })
}

/// Prompt for every field that is empty or carries an error.
fn fill_missing(form: &mut PaymentForm) -> Result<()> {
    let errors = form.errors().clone();
    let values = form.values().clone();

    if values.recipient.trim().is_empty() || errors.recipient.is_some() {
        let recipient = ui::input_allow_empty("Recipient address", &values.recipient)?;
        form.set_recipient(recipient);
    }
    if values.amount.trim().is_empty() || errors.amount.is_some() {
        let amount = ui::input_allow_empty("Amount", &values.amount)?;
        form.set_amount(amount);
    }
    Ok(())
}

/// Tick the spinner only while the form waits on the wallet.
fn spawn_spinner(busy: BusyHandle, progress: indicatif::ProgressBar) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticking = false;
        loop {
            if busy.is_busy() && !ticking {
                ui::start_spinner(&progress);
                ticking = true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
}
