//! Operator tooling for the Grandeur store.
//!
//! Two maintenance jobs that run directly against the store database:
//! * `seed` — load categories and products from a JSON catalog dump, skipping anything that already exists.
//! * `reset-orders` — push all in-progress orders (and their receipts) back to their initial statuses.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use grandeur_engine::{CatalogApiError, SqliteDatabase};

mod seed;

#[derive(Parser)]
#[command(name = "grandeur_tools", about = "Operator tooling for the Grandeur store database")]
struct Cli {
    /// Database connection URL. Falls back to GRANDEUR_DATABASE_URL.
    #[arg(short, long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed categories and products from a JSON catalog file
    Seed {
        /// Path to the catalog file ({"products": [...]})
        #[arg(short, long, default_value = "products.json")]
        file: PathBuf,
    },
    /// Reset all in-progress orders and their receipts back to their initial statuses
    ResetOrders,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();
    let db = match &cli.database_url {
        Some(url) => SqliteDatabase::new_with_url(url, 5).await?,
        None => SqliteDatabase::new(5).await?,
    };
    match cli.command {
        Commands::Seed { file } => seed::run(&db, &file).await?,
        Commands::ResetOrders => {
            let (orders, receipts) = db.reset_order_statuses().await.map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("Reset {orders} order(s) to Pending and {receipts} receipt(s) to 'Order Placed'.");
        },
    }
    Ok(())
}

pub(crate) fn describe_catalog_error(e: &CatalogApiError) -> String {
    match e {
        CatalogApiError::ProductAlreadyExists(name) => format!("product '{name}' already exists"),
        CatalogApiError::CategoryAlreadyExists(name) => format!("category '{name}' already exists"),
        other => other.to_string(),
    }
}
