//! `BakeTracker` maintenance entry point.
//!
//! Initializes the database, seeds the flavor catalog from config.toml, and
//! runs a full totals-recalculation sweep so every event and delivery agrees
//! with its line items before any other tooling reads the file.

use bake_tracker::{
    config,
    core::{delivery, event, flavor},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the catalog configuration
    let app_config = config::catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load config.toml: {e}"))?;
    info!(
        flavors = app_config.flavors.len(),
        default_unit_price = app_config.pricing.default_unit_price,
        "Loaded catalog configuration."
    );

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed missing catalog flavors
    let seeded = flavor::seed_flavors(&db, &app_config.flavors)
        .await
        .inspect_err(|e| error!("Failed to seed flavors: {e}"))?;
    info!(seeded, "Catalog seeding complete.");

    // 6. Repair any stale derived totals
    let events = event::recalculate_all_event_totals(&db)
        .await
        .inspect_err(|e| error!("Event recalculation sweep failed: {e}"))?;
    let deliveries = delivery::recalculate_all_delivery_totals(&db)
        .await
        .inspect_err(|e| error!("Delivery recalculation sweep failed: {e}"))?;
    info!(events, deliveries, "Recalculation sweep complete.");

    Ok(())
}
