//! Delivery line-item business logic.
//!
//! Same discipline as event items - derive, persist, recalculate the parent,
//! one transaction per mutation - with one difference in price handling:
//! delivery items carry a `unit_price` *snapshot* taken when the item is
//! added. The snapshot wins at derive time; only when it is absent does the
//! catalog (and then the configured default) fill in.

use crate::{
    core::pricing::{self, PricingConfig},
    entities::{Delivery, DeliveryItem, delivery_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Partial update for a delivery line item. `None` leaves a field unchanged;
/// `Some(None)` clears a snapshot. Derived fields are recomputed, never set.
#[derive(Debug, Default, Clone)]
pub struct DeliveryItemUpdate {
    /// Units prepared and dropped off
    pub prepared: Option<i32>,
    /// Price-per-unit snapshot (`Some(None)` clears it)
    pub unit_price: Option<Option<f64>>,
    /// Cost-per-unit snapshot (`Some(None)` clears it)
    pub unit_cost: Option<Option<f64>>,
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

fn validate_money(amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Retrieves all line items for a delivery, in insertion order.
pub async fn get_items_for_delivery<C>(
    db: &C,
    delivery_id: i64,
) -> Result<Vec<delivery_item::Model>>
where
    C: ConnectionTrait,
{
    DeliveryItem::find()
        .filter(delivery_item::Column::DeliveryId.eq(delivery_id))
        .order_by_asc(delivery_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific line item by its unique ID.
pub async fn get_delivery_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<delivery_item::Model>> {
    DeliveryItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a line item under a delivery and recalculates the delivery's
/// totals, in one database transaction.
///
/// Price and cost snapshots come from the explicit arguments when given,
/// otherwise from the catalog entry matching the flavor name. A flavor with
/// no catalog match leaves the price snapshot empty; the item still prices
/// against the configured default at derive time.
///
/// # Errors
/// Returns an error if:
/// - The flavor name is empty
/// - `prepared` is negative, or a price/cost is negative or not finite
/// - No delivery with the given id exists
/// - A database write fails
pub async fn create_delivery_item(
    db: &DatabaseConnection,
    delivery_id: i64,
    flavor_name: String,
    prepared: i32,
    unit_price: Option<f64>,
    unit_cost: Option<f64>,
    config: &PricingConfig,
) -> Result<delivery_item::Model> {
    if flavor_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Flavor name cannot be empty".to_string(),
        });
    }
    validate_quantity(prepared)?;
    for amount in [unit_price, unit_cost].into_iter().flatten() {
        validate_money(amount)?;
    }

    let txn = db.begin().await?;

    Delivery::find_by_id(delivery_id)
        .one(&txn)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?;

    let flavor = crate::core::flavor::get_flavor_by_name(&txn, flavor_name.trim()).await?;
    let unit_price = unit_price.or_else(|| flavor.as_ref().map(|f| f.unit_price));
    let unit_cost = unit_cost.or_else(|| flavor.and_then(|f| f.unit_cost));

    let effective_price = pricing::resolve_unit_price(unit_price, config);
    let figures = pricing::derive_delivery_item(prepared, effective_price, unit_cost);

    let item = delivery_item::ActiveModel {
        delivery_id: Set(delivery_id),
        flavor_name: Set(flavor_name.trim().to_string()),
        prepared: Set(prepared),
        unit_price: Set(unit_price),
        unit_cost: Set(unit_cost),
        revenue: Set(figures.revenue),
        cogs: Set(figures.cogs),
        profit: Set(figures.profit),
        ..Default::default()
    };

    let result = item.insert(&txn).await?;

    crate::core::delivery::recalculate_delivery_totals(&txn, delivery_id).await?;

    txn.commit().await?;

    Ok(result)
}

/// Merges changed fields onto a line item, re-derives its computed fields,
/// and recalculates the owning delivery's totals, in one database
/// transaction.
///
/// The stored price snapshot wins; when it is empty the catalog is consulted
/// by flavor name, and failing that the configured default applies.
///
/// # Errors
/// Returns an error if the item does not exist, a supplied value fails
/// validation, or a database write fails.
pub async fn update_delivery_item(
    db: &DatabaseConnection,
    item_id: i64,
    update: DeliveryItemUpdate,
    config: &PricingConfig,
) -> Result<delivery_item::Model> {
    if let Some(quantity) = update.prepared {
        validate_quantity(quantity)?;
    }
    for amount in [update.unit_price, update.unit_cost]
        .into_iter()
        .flatten()
        .flatten()
    {
        validate_money(amount)?;
    }

    let txn = db.begin().await?;

    let item = DeliveryItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let delivery_id = item.delivery_id;
    let prepared = update.prepared.unwrap_or(item.prepared);
    let unit_price = update.unit_price.unwrap_or(item.unit_price);
    let unit_cost = update.unit_cost.unwrap_or(item.unit_cost);

    let snapshot_price = match unit_price {
        Some(price) => Some(price),
        None => crate::core::flavor::get_flavor_by_name(&txn, &item.flavor_name)
            .await?
            .map(|f| f.unit_price),
    };
    let effective_price = pricing::resolve_unit_price(snapshot_price, config);

    let figures = pricing::derive_delivery_item(prepared, effective_price, unit_cost);

    let mut item: delivery_item::ActiveModel = item.into();
    item.prepared = Set(prepared);
    item.unit_price = Set(unit_price);
    item.unit_cost = Set(unit_cost);
    item.revenue = Set(figures.revenue);
    item.cogs = Set(figures.cogs);
    item.profit = Set(figures.profit);

    let result = item.update(&txn).await?;

    crate::core::delivery::recalculate_delivery_totals(&txn, delivery_id).await?;

    txn.commit().await?;

    Ok(result)
}

/// Deletes a line item and recalculates the owning delivery's totals, in
/// one database transaction.
///
/// # Errors
/// Returns an error if the item does not exist or a database write fails.
pub async fn delete_delivery_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let item = DeliveryItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let delivery_id = item.delivery_id;
    item.delete(&txn).await?;

    crate::core::delivery::recalculate_delivery_totals(&txn, delivery_id).await?;

    txn.commit().await?;
    Ok(())
}

/// Re-syncs a line item's cost snapshot to the catalog's current unit cost
/// for its flavor. No-op when the catalog has no match or no recorded cost.
///
/// # Errors
/// Returns an error if the item does not exist or a database write fails.
pub async fn apply_base_cost(
    db: &DatabaseConnection,
    item_id: i64,
    config: &PricingConfig,
) -> Result<delivery_item::Model> {
    let item = DeliveryItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let Some(flavor) = crate::core::flavor::get_flavor_by_name(db, &item.flavor_name).await?
    else {
        return Ok(item);
    };
    let Some(base_cost) = flavor.unit_cost else {
        return Ok(item);
    };

    update_delivery_item(
        db,
        item_id,
        DeliveryItemUpdate {
            unit_cost: Some(Some(base_cost)),
            ..Default::default()
        },
        config,
    )
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::delivery::get_delivery_by_id;
    use crate::core::flavor::{FlavorUpdate, create_flavor, update_flavor};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_delivery_item_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let config = PricingConfig::default();

        let result =
            create_delivery_item(&db, 1, String::new(), 10, None, None, &config).await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = create_delivery_item(
            &db,
            1,
            "Vanilla Bean".to_string(),
            -1,
            None,
            None,
            &config,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: -1 }
        ));

        let result = create_delivery_item(
            &db,
            1,
            "Vanilla Bean".to_string(),
            10,
            Some(f64::INFINITY),
            None,
            &config,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_delivery_item_parent_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let config = PricingConfig::default();

        let result = create_delivery_item(
            &db,
            999,
            "Vanilla Bean".to_string(),
            10,
            None,
            None,
            &config,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DeliveryNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_item_consignment_figures() -> Result<()> {
        // Scenario: 100 prepared at $5 with a $1.50 unit cost
        let (db, delivery) = setup_with_delivery().await?;
        let config = PricingConfig::default();

        let item = create_delivery_item(
            &db,
            delivery.id,
            "Vanilla Bean".to_string(),
            100,
            Some(5.0),
            Some(1.5),
            &config,
        )
        .await?;

        assert_eq!(item.revenue, 500.0);
        assert_close(item.cogs, 150.0);
        assert_close(item.profit, 350.0);

        let parent = get_delivery_by_id(&db, delivery.id).await?.unwrap();
        assert_eq!(parent.total_prepared, 100);
        assert_eq!(parent.total_revenue, 500.0);
        assert_close(parent.gross_profit, 350.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_item_snapshots_catalog_price_and_cost() -> Result<()> {
        let (db, delivery) = setup_with_delivery().await?;
        let config = PricingConfig::default();
        create_flavor(&db, "Pistachio".to_string(), 6.0, Some(2.1), true).await?;

        let item = create_delivery_item(
            &db,
            delivery.id,
            "Pistachio".to_string(),
            10,
            None,
            None,
            &config,
        )
        .await?;

        assert_eq!(item.unit_price, Some(6.0));
        assert_eq!(item.unit_cost, Some(2.1));
        assert_eq!(item.revenue, 60.0);
        assert_close(item.cogs, 21.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_item_unknown_flavor_prices_at_default() -> Result<()> {
        let (db, delivery) = setup_with_delivery().await?;
        let config = PricingConfig {
            default_unit_price: 4.0,
        };

        let item = create_delivery_item(
            &db,
            delivery.id,
            "Mystery".to_string(),
            10,
            None,
            None,
            &config,
        )
        .await?;

        // No snapshot to store, but revenue uses the default
        assert_eq!(item.unit_price, None);
        assert_eq!(item.revenue, 40.0);
        assert_eq!(item.cogs, 0.0);
        assert_eq!(item.profit, 40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_snapshot_price_wins_over_catalog() -> Result<()> {
        let (db, delivery) = setup_with_delivery().await?;
        let config = PricingConfig::default();
        let flavor = create_flavor(&db, "Vanilla Bean".to_string(), 5.0, None, true).await?;

        let item = create_delivery_item(
            &db,
            delivery.id,
            "Vanilla Bean".to_string(),
            10,
            None,
            None,
            &config,
        )
        .await?;
        assert_eq!(item.unit_price, Some(5.0));

        // Catalog price changes; the stored snapshot keeps winning
        update_flavor(
            &db,
            flavor.id,
            FlavorUpdate {
                unit_price: Some(7.0),
                ..Default::default()
            },
        )
        .await?;

        let updated = update_delivery_item(
            &db,
            item.id,
            DeliveryItemUpdate {
                prepared: Some(20),
                ..Default::default()
            },
            &config,
        )
        .await?;

        assert_eq!(updated.unit_price, Some(5.0));
        assert_eq!(updated.revenue, 100.0);

        // Clearing the snapshot falls back to the current catalog price
        let cleared = update_delivery_item(
            &db,
            item.id,
            DeliveryItemUpdate {
                unit_price: Some(None),
                ..Default::default()
            },
            &config,
        )
        .await?;
        assert_eq!(cleared.unit_price, None);
        assert_eq!(cleared.revenue, 140.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_null_cost_profit_equals_revenue() -> Result<()> {
        let (db, delivery) = setup_with_delivery().await?;
        let config = PricingConfig::default();

        let item = create_delivery_item(
            &db,
            delivery.id,
            "Vanilla Bean".to_string(),
            40,
            Some(5.0),
            None,
            &config,
        )
        .await?;

        assert_eq!(item.unit_cost, None);
        assert_eq!(item.revenue, 200.0);
        assert_eq!(item.cogs, 0.0);
        assert_eq!(item.profit, 200.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_item_recalculates_parent() -> Result<()> {
        let (db, delivery) = setup_with_delivery().await?;
        create_test_delivery_item(&db, delivery.id, "Vanilla Bean", 100).await?;
        let second = create_test_delivery_item(&db, delivery.id, "Raspberry", 50).await?;

        let parent = get_delivery_by_id(&db, delivery.id).await?.unwrap();
        assert_eq!(parent.total_prepared, 150);
        assert_eq!(parent.total_revenue, 750.0);

        delete_delivery_item(&db, second.id).await?;

        let parent = get_delivery_by_id(&db, delivery.id).await?.unwrap();
        assert_eq!(parent.total_prepared, 100);
        assert_eq!(parent.total_revenue, 500.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_item_not_found_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let config = PricingConfig::default();

        let result = update_delivery_item(&db, 999, DeliveryItemUpdate::default(), &config).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ItemNotFound { id: 999 }
        ));

        let result = delete_delivery_item(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ItemNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_base_cost_resyncs_and_noops() -> Result<()> {
        let (db, delivery) = setup_with_delivery().await?;
        let config = PricingConfig::default();
        create_flavor(&db, "Vanilla Bean".to_string(), 5.0, Some(1.2), true).await?;

        let item = create_delivery_item(
            &db,
            delivery.id,
            "Vanilla Bean".to_string(),
            10,
            None,
            Some(2.0),
            &config,
        )
        .await?;

        let synced = apply_base_cost(&db, item.id, &config).await?;
        assert_eq!(synced.unit_cost, Some(1.2));
        assert_close(synced.cogs, 12.0);

        // No catalog match: untouched
        let orphan = create_delivery_item(
            &db,
            delivery.id,
            "Mystery".to_string(),
            5,
            Some(5.0),
            Some(0.8),
            &config,
        )
        .await?;
        let result = apply_base_cost(&db, orphan.id, &config).await?;
        assert_eq!(result.unit_cost, Some(0.8));

        Ok(())
    }
}
