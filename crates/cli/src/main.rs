//! Cartstore CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! cart show
//!
//! # Add one unit of product 42
//! cart add 42
//!
//! # Set product 42 to three units
//! cart set 42 3
//!
//! # Remove product 42
//! cart remove 42
//! ```
//!
//! Uses the same environment variables as the storefront binary
//! (`CATALOG_API_URL`, `CART_STORAGE_DIR`, `CART_NAMESPACE`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use cartstore_core::ProductId;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Cartstore CLI tools")]
struct Cli {
    /// Print the cart as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the persisted cart
    Show,
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Set {
        /// Catalog product ID
        product_id: ProductId,
        /// New amount (zero or less is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing on stderr; stdout carries the cart
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cart=info,cartstore_storefront=warn".into()),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CommandError> {
    let store = commands::cart::open_store().await?;

    let notification = match cli.command {
        Commands::Show => None,
        Commands::Add { product_id } => commands::cart::add(&store, product_id).await,
        Commands::Remove { product_id } => commands::cart::remove(&store, product_id).await,
        Commands::Set { product_id, amount } => {
            commands::cart::set(&store, product_id, amount).await
        }
    };

    commands::cart::report(&store, notification.as_ref(), cli.json)
}
