//! Database configuration module for `BakeTracker`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{Delivery, DeliveryItem, Event, EventItem, Flavor};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/bake_tracker.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct definitions.
/// It creates tables for flavors, events, event items, deliveries, and delivery items.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let flavor_table = schema.create_table_from_entity(Flavor);
    let event_table = schema.create_table_from_entity(Event);
    let event_item_table = schema.create_table_from_entity(EventItem);
    let delivery_table = schema.create_table_from_entity(Delivery);
    let delivery_item_table = schema.create_table_from_entity(DeliveryItem);

    db.execute(builder.build(&flavor_table)).await?;
    db.execute(builder.build(&event_table)).await?;
    db.execute(builder.build(&event_item_table)).await?;
    db.execute(builder.build(&delivery_table)).await?;
    db.execute(builder.build(&delivery_item_table)).await?;

    Ok(())
}
