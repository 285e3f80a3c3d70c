//! Catalog Sync CLI - CSV-driven Shopify batch jobs.
//!
//! # Usage
//!
//! ```bash
//! # Snapshot the store for every known SKU
//! catalog-sync find-products -i data/all_skus.csv --output data
//!
//! # Work out what to add, update and zero (no remote calls)
//! catalog-sync reconcile --folder data --clean-file supplier_clean.csv
//!
//! # Apply the results
//! catalog-sync create-products -i data/others_add_products.csv
//! catalog-sync update-inventory -i data/os_update_products.csv --report inventory.csv
//! ```
//!
//! # Commands
//!
//! - `create-products` - Create draft products with media and size variants
//! - `find-products` - Snapshot store quantities and costs per SKU
//! - `zero-inventory` - Set available quantity to zero
//! - `update-inventory` - Set per-size available quantities
//! - `update-costs` - Set inventory item unit costs
//! - `reconcile` - Diff a supplier catalog against a snapshot, offline

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use catalog_sync::FailurePolicy;
use clap::{Args, Parser, Subcommand};

mod commands;
mod telemetry;

use commands::jobs::{Job, RunOptions};

#[derive(Parser)]
#[command(name = "catalog-sync")]
#[command(author, version, about = "CSV-driven Shopify catalog sync jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create draft products, with media and one variant per size
    CreateProducts(RunArgs),
    /// Snapshot store quantities and costs per SKU
    FindProducts {
        #[command(flatten)]
        run: RunArgs,

        /// Folder receiving shopify_data.csv and to_add.csv
        #[arg(short, long, env = "SYNC_OUTPUT_FOLDER", default_value = ".")]
        output: PathBuf,
    },
    /// Set the available quantity of each SKU to zero
    ZeroInventory(RunArgs),
    /// Set per-size available quantities from the supplier
    UpdateInventory(RunArgs),
    /// Set unit costs from the supplier
    UpdateCosts(RunArgs),
    /// Diff a supplier catalog against the last snapshot (no remote calls)
    Reconcile {
        /// Folder holding the inputs; outputs are written next to them
        #[arg(short, long, env = "SYNC_FOLDER")]
        folder: PathBuf,

        /// Supplier catalog, relative to the folder
        #[arg(short, long, env = "SYNC_CLEAN_FILE")]
        clean_file: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input CSV file
    #[arg(short, long, env = "SYNC_INPUT")]
    input: PathBuf,

    /// Write a line,key,outcome,detail report to this CSV file
    #[arg(long, env = "SYNC_REPORT")]
    report: Option<PathBuf>,

    /// Stop at the first row that fails
    #[arg(long)]
    abort_on_error: bool,
}

impl RunArgs {
    fn into_options(self) -> RunOptions {
        RunOptions {
            input: self.input,
            report: self.report,
            policy: if self.abort_on_error {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present so telemetry settings can come from it too
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _sentry_guard = telemetry::init(&telemetry::TelemetryConfig::from_env());

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::error!("Run aborted after a row error");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command. `Ok(false)` means the run aborted early.
async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let (job, args) = match cli.command {
        Commands::Reconcile { folder, clean_file } => {
            commands::reconcile::run(&folder, &clean_file)?;
            return Ok(true);
        }
        Commands::CreateProducts(args) => (Job::CreateProducts, args),
        Commands::FindProducts { run, output } => (Job::FindProducts { output }, run),
        Commands::ZeroInventory(args) => (Job::ZeroInventory, args),
        Commands::UpdateInventory(args) => (Job::UpdateInventory, args),
        Commands::UpdateCosts(args) => (Job::UpdateCosts, args),
    };

    let summary = commands::jobs::run(job, &args.into_options()).await?;
    Ok(!summary.aborted)
}
