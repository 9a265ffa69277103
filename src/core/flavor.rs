//! Flavor catalog business logic.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! catalog flavors, plus seeding the catalog from configuration. Line items
//! elsewhere in the system copy a flavor's name and cost at write time, so
//! nothing here cascades into existing events or deliveries - deleting a
//! flavor only affects what can be looked up from now on.

use crate::{
    entities::{Flavor, flavor},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

use crate::config::catalog::FlavorSeed;

/// Partial update for a catalog flavor. `None` leaves a field unchanged;
/// for `unit_cost`, `Some(None)` clears the stored cost.
#[derive(Debug, Default, Clone)]
pub struct FlavorUpdate {
    /// New display name
    pub name: Option<String>,
    /// New selling price per unit
    pub unit_price: Option<f64>,
    /// New cost per unit (`Some(None)` clears it)
    pub unit_cost: Option<Option<f64>>,
    /// New active flag
    pub is_active: Option<bool>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Flavor name cannot be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_money(amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Retrieves every flavor in the catalog, ordered alphabetically by name.
pub async fn get_all_flavors(db: &DatabaseConnection) -> Result<Vec<flavor::Model>> {
    Flavor::find()
        .order_by_asc(flavor::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the flavors currently offered for new line items, ordered by name.
pub async fn get_active_flavors(db: &DatabaseConnection) -> Result<Vec<flavor::Model>> {
    Flavor::find()
        .filter(flavor::Column::IsActive.eq(true))
        .order_by_asc(flavor::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a flavor by its exact name, returning None if there is no match.
///
/// This is the lookup the derived-field calculator uses to resolve a line
/// item's unit price, so it deliberately does not filter on `is_active`:
/// items referencing a retired flavor should keep pricing against it.
pub async fn get_flavor_by_name<C>(db: &C, name: &str) -> Result<Option<flavor::Model>>
where
    C: ConnectionTrait,
{
    Flavor::find()
        .filter(flavor::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a flavor by its unique ID.
pub async fn get_flavor_by_id(
    db: &DatabaseConnection,
    flavor_id: i64,
) -> Result<Option<flavor::Model>> {
    Flavor::find_by_id(flavor_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new catalog flavor, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The unit price or unit cost is negative or not finite
/// - The database insert operation fails
pub async fn create_flavor(
    db: &DatabaseConnection,
    name: String,
    unit_price: f64,
    unit_cost: Option<f64>,
    is_active: bool,
) -> Result<flavor::Model> {
    validate_name(&name)?;
    validate_money(unit_price)?;
    if let Some(cost) = unit_cost {
        validate_money(cost)?;
    }

    let flavor = flavor::ActiveModel {
        name: Set(name.trim().to_string()),
        unit_price: Set(unit_price),
        unit_cost: Set(unit_cost),
        is_active: Set(is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    flavor.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to an existing flavor.
///
/// Existing line items keep their snapshots; a price or cost change here is
/// only picked up by future edits and explicit base-cost re-syncs.
///
/// # Errors
/// Returns an error if the flavor does not exist, a supplied value fails
/// validation, or the database update fails.
pub async fn update_flavor(
    db: &DatabaseConnection,
    flavor_id: i64,
    update: FlavorUpdate,
) -> Result<flavor::Model> {
    if let Some(ref name) = update.name {
        validate_name(name)?;
    }
    if let Some(price) = update.unit_price {
        validate_money(price)?;
    }
    if let Some(Some(cost)) = update.unit_cost {
        validate_money(cost)?;
    }

    let mut flavor: flavor::ActiveModel = Flavor::find_by_id(flavor_id)
        .one(db)
        .await?
        .ok_or(Error::FlavorNotFound { id: flavor_id })?
        .into();

    if let Some(name) = update.name {
        flavor.name = Set(name.trim().to_string());
    }
    if let Some(price) = update.unit_price {
        flavor.unit_price = Set(price);
    }
    if let Some(cost) = update.unit_cost {
        flavor.unit_cost = Set(cost);
    }
    if let Some(active) = update.is_active {
        flavor.is_active = Set(active);
    }

    flavor.update(db).await.map_err(Into::into)
}

/// Permanently deletes a flavor from the catalog.
///
/// Line items that copied this flavor's name and cost are untouched; their
/// price lookups will fall back to the configured default from now on.
///
/// # Errors
/// Returns an error if the flavor does not exist or the delete fails.
pub async fn delete_flavor(db: &DatabaseConnection, flavor_id: i64) -> Result<()> {
    let flavor = Flavor::find_by_id(flavor_id)
        .one(db)
        .await?
        .ok_or(Error::FlavorNotFound { id: flavor_id })?;

    flavor.delete(db).await?;
    Ok(())
}

/// Inserts config-listed flavors that are missing from the catalog.
///
/// Matching is by exact name; flavors already present are left untouched,
/// so re-running the seed on every startup is safe.
pub async fn seed_flavors(db: &DatabaseConnection, seeds: &[FlavorSeed]) -> Result<usize> {
    let mut inserted = 0;

    for seed in seeds {
        if get_flavor_by_name(db, &seed.name).await?.is_some() {
            continue;
        }

        create_flavor(
            db,
            seed.name.clone(),
            seed.unit_price,
            seed.unit_cost,
            seed.is_active,
        )
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}
