//! StackPay Demo CLI
//!
//! Command-line interface for trying the StackPay SDK: build checkout links,
//! convert amounts, and run the checkout form against a terminal wallet.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod storage;
mod ui;
mod wallet;

#[derive(Parser)]
#[command(name = "stackpay-demo")]
#[command(about = "StackPay Demo CLI - Build payment links and submit gateway payments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom storage directory
    #[arg(long, global = true, env = "STACKPAY_DEMO_DIR")]
    storage_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the gateway configuration
    Init {
        /// Application name shown by the wallet
        #[arg(long)]
        app_name: Option<String>,

        /// Network (mainnet or testnet)
        #[arg(long)]
        network: Option<String>,

        /// Address that deployed the gateway contract
        #[arg(long)]
        contract_address: Option<String>,

        /// Gateway contract name
        #[arg(long)]
        contract_name: Option<String>,

        /// Base URL of the hosted checkout page
        #[arg(long)]
        checkout_url: Option<String>,
    },

    /// Show the effective configuration
    Config,

    /// Build a shareable checkout link
    Link {
        /// Merchant address
        recipient: String,

        /// Amount in display units (base units with --base-units)
        amount: String,

        /// Memo attached to the payment
        #[arg(short, long)]
        memo: Option<String>,

        /// Where checkout redirects after success
        #[arg(long)]
        redirect_url: Option<String>,

        /// Where checkout redirects after cancelling
        #[arg(long)]
        cancel_url: Option<String>,

        /// Interpret the amount as base units
        #[arg(long)]
        base_units: bool,

        /// Also render the link as a QR code
        #[arg(long)]
        qr: bool,
    },

    /// Pay a merchant through the checkout form
    Pay {
        /// Merchant address
        #[arg(short, long)]
        recipient: Option<String>,

        /// Amount in display units
        #[arg(short, long)]
        amount: Option<String>,

        /// Memo attached to the payment
        #[arg(short, long)]
        memo: Option<String>,

        /// Prefill the form from a checkout link
        #[arg(long)]
        link: Option<String>,
    },

    /// Convert between base and display units
    Convert {
        #[command(subcommand)]
        action: ConvertAction,
    },

    /// Show submitted payments
    Receipts {
        /// Transaction id to show details for
        #[arg(short, long)]
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConvertAction {
    /// Base units to display units
    ToDisplay {
        /// Amount in base units
        base: u64,
    },

    /// Display units to base units (sub-unit remainders are floored)
    ToBase {
        /// Amount in display units
        display: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("stackpay_demo_cli=debug,stackpay_lib=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("stackpay_demo_cli=info,stackpay_lib=warn")
            .init();
    }

    // Setup storage directory
    let storage_dir = if let Some(dir) = cli.storage_dir {
        std::path::PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("stackpay-demo")
    };

    // Dispatch commands
    match cli.command {
        Commands::Init {
            app_name,
            network,
            contract_address,
            contract_name,
            checkout_url,
        } => {
            let overrides = commands::init::Overrides {
                app_name,
                network,
                contract_address,
                contract_name,
                checkout_url,
            };
            commands::init::run(&storage_dir, overrides, cli.verbose).await?;
        }
        Commands::Config => {
            commands::config::run(&storage_dir, cli.verbose).await?;
        }
        Commands::Link {
            recipient,
            amount,
            memo,
            redirect_url,
            cancel_url,
            base_units,
            qr,
        } => {
            let args = commands::link::LinkArgs {
                recipient,
                amount,
                memo,
                redirect_url,
                cancel_url,
                base_units,
                qr,
            };
            commands::link::run(&storage_dir, args, cli.verbose).await?;
        }
        Commands::Pay {
            recipient,
            amount,
            memo,
            link,
        } => {
            commands::pay::run(&storage_dir, recipient, amount, memo, link, cli.verbose).await?;
        }
        Commands::Convert { action } => match action {
            ConvertAction::ToDisplay { base } => {
                commands::convert::to_display(base)?;
            }
            ConvertAction::ToBase { display } => {
                commands::convert::to_base(&display)?;
            }
        },
        Commands::Receipts { id } => {
            commands::receipts::run(&storage_dir, id.as_deref(), cli.verbose).await?;
        }
    }

    Ok(())
}
