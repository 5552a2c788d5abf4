//! Terminal wallet
//!
//! Stands in for a browser wallet extension: the connect and transaction
//! prompts are answered on the terminal. Nothing is signed; the user pastes
//! the transaction id their real wallet reported.

use async_trait::async_trait;
use dialoguer::{Confirm, Input};
use indicatif::ProgressBar;
use stackpay_lib::address::is_valid_address;
use stackpay_lib::capability::{
    AuthRequest, CapabilityResult, ContractCall, Outcome, TransactionBroadcaster, UserData,
    WalletAuthorizer,
};
use stackpay_lib::TransactionId;

use crate::ui;

/// Wallet answering prompts on the terminal.
///
/// Prompts suspend `progress` so a spinner drawn by the caller does not
/// overwrite them.
pub struct PromptWallet {
    progress: ProgressBar,
}

impl PromptWallet {
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }
}

#[async_trait]
impl WalletAuthorizer for PromptWallet {
    async fn authenticate(&self, request: &AuthRequest) -> CapabilityResult<Outcome<UserData>> {
        let request = request.clone();
        let progress = self.progress.clone();
        tokio::task::spawn_blocking(move || progress.suspend(|| prompt_connect(&request))).await?
    }
}

#[async_trait]
impl TransactionBroadcaster for PromptWallet {
    async fn open_contract_call(
        &self,
        call: ContractCall,
    ) -> CapabilityResult<Outcome<TransactionId>> {
        let progress = self.progress.clone();
        tokio::task::spawn_blocking(move || progress.suspend(|| prompt_contract_call(&call))).await?
    }
}

fn prompt_connect(request: &AuthRequest) -> CapabilityResult<Outcome<UserData>> {
    ui::header("Wallet");
    ui::info(&format!("{} wants to connect to your wallet", request.app.name));
    if let Some(icon) = &request.app.icon {
        ui::key_value("Icon", icon);
    }

    if !Confirm::new()
        .with_prompt("Connect wallet?")
        .default(true)
        .interact()?
    {
        tracing::debug!("connect prompt declined");
        return Ok(Outcome::Cancelled);
    }

    let previous = request
        .session
        .as_ref()
        .map(|user| user.address.clone())
        .unwrap_or_default();
    let address: String = Input::new()
        .with_prompt("Your address")
        .with_initial_text(previous)
        .validate_with(|input: &String| -> Result<(), &str> {
            if is_valid_address(input.trim()) {
                Ok(())
            } else {
                Err("not a valid address")
            }
        })
        .interact_text()?;

    Ok(Outcome::Finished(UserData::new(address.trim())))
}

fn prompt_contract_call(call: &ContractCall) -> CapabilityResult<Outcome<TransactionId>> {
    ui::header("Approve Transaction");
    ui::key_value("Network", call.network.as_str());
    ui::key_value("Contract", &call.contract_id());
    ui::key_value("Function", &call.function_name);
    for (index, arg) in call.function_args.iter().enumerate() {
        ui::key_value(&format!("Arg {index} ({})", arg.type_name()), &arg.to_string());
    }
    ui::key_value("Post-conditions", &format!("{:?}", call.post_condition_mode));
    ui::separator();

    if !Confirm::new()
        .with_prompt("Approve and broadcast?")
        .default(false)
        .interact()?
    {
        tracing::debug!(contract = %call.contract_id(), "transaction prompt declined");
        return Ok(Outcome::Cancelled);
    }

    let tx_id: String = Input::new()
        .with_prompt("Transaction id reported by your wallet")
        .validate_with(|input: &String| -> Result<(), &str> {
            normalize_tx_id(input).map(|_| ()).ok_or("expected 32 bytes of hex")
        })
        .interact_text()?;

    let tx_id = normalize_tx_id(&tx_id).ok_or("expected 32 bytes of hex")?;
    Ok(Outcome::Finished(TransactionId::new(tx_id)))
}

/// Canonical `0x`-prefixed lowercase form of a 32-byte hex transaction id.
pub fn normalize_tx_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).ok()?;
    (bytes.len() == 32).then(|| format!("0x{}", hex::encode(bytes)))
}
