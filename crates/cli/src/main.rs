//! RocketShoes CLI - inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cli cart show
//!
//! # Add, remove, set amount
//! rs-cli cart add 1
//! rs-cli cart remove 1
//! rs-cli cart set 1 3
//!
//! # Use a local catalog fixture instead of CATALOG_API_URL
//! rs-cli --fixture db.json cart add 1
//! ```
//!
//! # Commands
//!
//! - `cart` - Cart operations against the same storage slot the storefront uses

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;

mod commands;

use commands::cart::{CartAction, CartCommandError, CartSource};

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes CLI tools")]
struct Cli {
    /// Serve the catalog from a json-server style fixture file
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Directory holding the persisted cart (overrides `CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Print the cart
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
        /// New amount; zero or less is ignored
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl From<CartCommand> for CartAction {
    fn from(command: CartCommand) -> Self {
        match command {
            CartCommand::Show => Self::Show,
            CartCommand::Add { product_id } => Self::Add(product_id),
            CartCommand::Remove { product_id } => Self::Remove(product_id),
            CartCommand::Set { product_id, amount } => Self::SetAmount(product_id, amount),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e {
            CartCommandError::Rejected(notice) => tracing::warn!("{notice}"),
            other => tracing::error!("Command failed: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CartCommandError> {
    let source = CartSource {
        fixture: cli.fixture,
        storage_dir: cli.storage_dir,
    };

    match cli.command {
        Commands::Cart { action } => {
            let rendered = commands::cart::run(&source, action.into()).await?;
            #[allow(clippy::print_stdout)]
            {
                println!("{rendered}");
            }
        }
    }
    Ok(())
}
