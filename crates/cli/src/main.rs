//! Almacen CLI - Catalog imports and configuration tools.
//!
//! # Usage
//!
//! ```bash
//! # Import display ranks from a CSV (Codigo, Orden columns)
//! almacen-cli import ranks ordenes.csv
//!
//! # Import the enabled-product list from a JSON array of codes
//! almacen-cli import enabled habilitados.json
//!
//! # Forward a product sheet to the backend importer
//! almacen-cli import products productos.xlsx
//!
//! # Show or seed the shop configuration
//! almacen-cli config show
//! almacen-cli config init
//! ```
//!
//! # Environment
//!
//! - `ALMACEN_API_URL` - Base URL of the backend commerce API
//! - `ALMACEN_ADMIN_USER` / `ALMACEN_ADMIN_PASSWORD` - Operator
//!   credentials; the CLI logs in like the panel does and uses the
//!   issued token

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "almacen-cli")]
#[command(author, version, about = "Almacen CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import catalog data
    Import {
        #[command(subcommand)]
        target: ImportTarget,
    },
    /// Manage the shop configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ImportTarget {
    /// Import display ranks from a CSV with Codigo and Orden columns
    Ranks {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Import the enabled-product list from a JSON array of codes
    Enabled {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Forward a product sheet (Excel) to the backend importer
    Products {
        /// Path to the sheet
        file: PathBuf,
    },
    /// Forward an order sheet (Excel) to the backend importer
    Orders {
        /// Path to the sheet
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current shop configuration as JSON
    Show,
    /// Seed an empty configuration document
    Init,
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
        Commands::Import { target } => match target {
            ImportTarget::Ranks { file } => commands::import::ranks(&file).await?,
            ImportTarget::Enabled { file } => commands::import::enabled(&file).await?,
            ImportTarget::Products { file } => commands::import::products(&file).await?,
            ImportTarget::Orders { file } => commands::import::orders(&file).await?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show().await?,
            ConfigAction::Init => commands::config::init().await?,
        },
    }
    Ok(())
}
