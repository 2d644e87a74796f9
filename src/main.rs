#![allow(clippy::result_large_err)]

use costing_buddy::{
    bot::{self, BotData},
    config::{self, catalog},
    core::seed,
    errors::{Error, Result},
    scraper::JumiaScraper,
};
use dotenvy::dotenv;
use std::{env, path::Path};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Seed catalog read on startup when present
const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load conversion factors and scraper settings
    let settings = config::settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the starter catalog (if present)
    let catalog_path =
        env::var("CATALOG_PATH").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string());
    if Path::new(&catalog_path).exists() {
        let starter = catalog::load_catalog(&catalog_path)?;
        let summary = seed::seed_catalog(&db, &starter, &settings.conversion)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        info!(
            "Catalog seeded: {} material(s), {} product(s), {} recipe line(s) created",
            summary.materials_created, summary.products_created, summary.recipe_lines_created
        );
    } else {
        warn!("No catalog found at {catalog_path}. Starting with the existing database only.");
    }

    // 6. Run the bot
    let scraper = JumiaScraper::new(&settings.scraper)?;
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, settings, scraper)).await
}
