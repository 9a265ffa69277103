//! Shared test utilities for `BakeTracker`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{delivery, delivery_item, event, event_item, flavor, pricing::PricingConfig},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date for test fixtures.
///
/// # Panics
/// Panics if the components do not form a valid date.
#[allow(clippy::unwrap_used)]
pub fn test_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Asserts two dollar amounts are equal to within rounding noise.
///
/// Derived figures are products of prices and quantities, so exact float
/// comparison is too strict for values like `27 * 1.16`.
///
/// # Panics
/// Panics when the amounts differ by more than a millionth of a cent.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Creates a test flavor with sensible defaults.
///
/// # Defaults
/// * `unit_price`: 5.0
/// * `unit_cost`: Some(1.16)
/// * `is_active`: true
pub async fn create_test_flavor(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::flavor::Model> {
    flavor::create_flavor(db, name.to_string(), 5.0, Some(1.16), true).await
}

/// Creates a test event with sensible defaults.
///
/// # Defaults
/// * `event_date`: 2025-06-07
/// * `location`: None
/// * `event_cost`: 0.0
/// * `notes`: None
pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::event::Model> {
    event::create_event(
        db,
        name.to_string(),
        test_date(2025, 6, 7),
        None,
        0.0,
        None,
    )
    .await
}

/// Creates a test delivery with sensible defaults.
///
/// # Defaults
/// * `date_prepared`: 2025-01-01
/// * `dropoff_date`: None
/// * `notes`: None
pub async fn create_test_delivery(
    db: &DatabaseConnection,
    store_name: &str,
) -> Result<entities::delivery::Model> {
    delivery::create_delivery(db, store_name.to_string(), test_date(2025, 1, 1), None, None).await
}

/// Creates an event line item with `prepared` units and marks `sold` of them
/// sold, using the default pricing config (catalog price or the $5 default,
/// unit cost $1.16).
pub async fn create_test_event_item(
    db: &DatabaseConnection,
    event_id: i64,
    flavor_name: &str,
    prepared: i32,
    sold: i32,
) -> Result<entities::event_item::Model> {
    let config = PricingConfig::default();

    let item = event_item::create_event_item(
        db,
        event_id,
        flavor_name.to_string(),
        prepared,
        Some(1.16),
        &config,
    )
    .await?;

    if sold == 0 {
        return Ok(item);
    }

    event_item::update_event_item(
        db,
        item.id,
        event_item::EventItemUpdate {
            sold: Some(sold),
            ..Default::default()
        },
        &config,
    )
    .await
}

/// Creates a delivery line item with `prepared` units at a $5 price and
/// $1.50 cost snapshot, using the default pricing config.
pub async fn create_test_delivery_item(
    db: &DatabaseConnection,
    delivery_id: i64,
    flavor_name: &str,
    prepared: i32,
) -> Result<entities::delivery_item::Model> {
    delivery_item::create_delivery_item(
        db,
        delivery_id,
        flavor_name.to_string(),
        prepared,
        Some(5.0),
        Some(1.5),
        &PricingConfig::default(),
    )
    .await
}

/// Sets up a complete test environment with an event.
/// Returns (db, event) for common test scenarios.
pub async fn setup_with_event() -> Result<(DatabaseConnection, entities::event::Model)> {
    let db = setup_test_db().await?;
    let event = create_test_event(&db, "Test Event").await?;
    Ok((db, event))
}

/// Sets up a complete test environment with a delivery.
/// Returns (db, delivery) for common test scenarios.
pub async fn setup_with_delivery() -> Result<(DatabaseConnection, entities::delivery::Model)> {
    let db = setup_test_db().await?;
    let delivery = create_test_delivery(&db, "Test Store").await?;
    Ok((db, delivery))
}
