//! Sailbridge CLI - credential checks and sync backfills.
//!
//! # Usage
//!
//! ```bash
//! # Check the configured Sailthru credentials
//! sb-cli validate
//!
//! # List transactional templates on the account
//! sb-cli templates
//!
//! # Backfill a product from a snapshot file
//! sb-cli sync product fixtures/product.json --store 1
//!
//! # Backfill an order from a snapshot file
//! sb-cli sync order fixtures/order.json
//! ```
//!
//! # Commands
//!
//! - `validate` - Probe the Sailthru API with the configured credentials
//! - `templates` - List transactional templates on the account
//! - `sync` - Replay entity snapshots through the sync engine

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Sailbridge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the Sailthru API with the configured credentials
    Validate,
    /// List transactional templates on the account
    Templates,
    /// Replay an entity snapshot through the sync engine
    Sync {
        #[command(subcommand)]
        target: SyncTarget,
    },
}

#[derive(Subcommand)]
enum SyncTarget {
    /// Sync a product snapshot to the content library
    Product {
        /// Path to a product snapshot JSON file
        file: PathBuf,

        /// Store view id scoping URLs and price (defaults to the product's
        /// first associated store)
        #[arg(short, long)]
        store: Option<i64>,
    },
    /// Sync an order snapshot to the purchase log
    Order {
        /// Path to an order snapshot JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate => commands::account::validate().await?,
        Commands::Templates => commands::account::templates().await?,
        Commands::Sync { target } => match target {
            SyncTarget::Product { file, store } => {
                commands::sync::product(&file, store).await?;
            }
            SyncTarget::Order { file } => commands::sync::order(&file).await?,
        },
    }
    Ok(())
}
