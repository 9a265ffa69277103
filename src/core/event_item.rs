//! Event line-item business logic.
//!
//! Every mutation here follows the same rule: derive the item's computed
//! fields with the pricing calculator, persist the row, then recalculate the
//! owning event's totals - all inside one database transaction, so the
//! parent's aggregates can never be observed out of step with its children.
//! The unit price is resolved from the catalog by flavor name at every edit
//! (falling back to the configured default), while the unit cost is a
//! snapshot owned by the item itself.

use crate::{
    core::pricing::{self, PricingConfig},
    entities::{Event, EventItem, event_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Partial update for an event line item. `None` leaves a field unchanged;
/// `unit_cost: Some(None)` clears the cost snapshot. Derived fields
/// (`remaining`, `revenue`, `cogs`, `profit`) are recomputed, never set.
#[derive(Debug, Default, Clone)]
pub struct EventItemUpdate {
    /// Units brought to the event
    pub prepared: Option<i32>,
    /// Units sold
    pub sold: Option<i32>,
    /// Units given away
    pub giveaway: Option<i32>,
    /// Cost-per-unit snapshot (`Some(None)` clears it)
    pub unit_cost: Option<Option<f64>>,
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(())
}

fn validate_cost(cost: f64) -> Result<()> {
    if cost < 0.0 || !cost.is_finite() {
        return Err(Error::InvalidAmount { amount: cost });
    }
    Ok(())
}

/// Retrieves all line items for an event, in insertion order.
pub async fn get_items_for_event<C>(db: &C, event_id: i64) -> Result<Vec<event_item::Model>>
where
    C: ConnectionTrait,
{
    EventItem::find()
        .filter(event_item::Column::EventId.eq(event_id))
        .order_by_asc(event_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific line item by its unique ID.
pub async fn get_event_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<event_item::Model>> {
    EventItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a line item under an event and recalculates the event's totals,
/// in one database transaction.
///
/// Fresh items start unsold: `sold` and `giveaway` are zero and `remaining`
/// equals `prepared`. When no explicit `unit_cost` is given, the catalog's
/// current cost for the flavor is copied onto the item (the add-time half of
/// the base-cost rule); an explicit value records a custom cost instead.
///
/// # Errors
/// Returns an error if:
/// - The flavor name is empty
/// - `prepared` is negative, or the cost is negative or not finite
/// - No event with the given id exists
/// - A database write fails
pub async fn create_event_item(
    db: &DatabaseConnection,
    event_id: i64,
    flavor_name: String,
    prepared: i32,
    unit_cost: Option<f64>,
    config: &PricingConfig,
) -> Result<event_item::Model> {
    if flavor_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Flavor name cannot be empty".to_string(),
        });
    }
    validate_quantity(prepared)?;
    if let Some(cost) = unit_cost {
        validate_cost(cost)?;
    }

    let txn = db.begin().await?;

    Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let flavor = crate::core::flavor::get_flavor_by_name(&txn, flavor_name.trim()).await?;
    let unit_price =
        pricing::resolve_unit_price(flavor.as_ref().map(|f| f.unit_price), config);
    let unit_cost = unit_cost.or_else(|| flavor.and_then(|f| f.unit_cost));

    let figures = pricing::derive_event_item(prepared, 0, 0, unit_price, unit_cost);

    let item = event_item::ActiveModel {
        event_id: Set(event_id),
        flavor_name: Set(flavor_name.trim().to_string()),
        prepared: Set(prepared),
        remaining: Set(figures.remaining),
        giveaway: Set(0),
        sold: Set(0),
        revenue: Set(figures.revenue),
        unit_cost: Set(unit_cost),
        cogs: Set(figures.cogs),
        profit: Set(figures.profit),
        ..Default::default()
    };

    let result = item.insert(&txn).await?;

    crate::core::event::recalculate_event_totals(&txn, event_id).await?;

    txn.commit().await?;

    Ok(result)
}

/// Merges changed fields onto a line item, re-derives its computed fields,
/// and recalculates the owning event's totals, in one database transaction.
///
/// The effective value of each quantity is the newly supplied one if
/// present, otherwise the stored one; the unit price is re-resolved from the
/// catalog by the item's flavor name on every call.
///
/// # Errors
/// Returns an error if the item does not exist, a supplied value fails
/// validation, or a database write fails.
pub async fn update_event_item(
    db: &DatabaseConnection,
    item_id: i64,
    update: EventItemUpdate,
    config: &PricingConfig,
) -> Result<event_item::Model> {
    for quantity in [update.prepared, update.sold, update.giveaway]
        .into_iter()
        .flatten()
    {
        validate_quantity(quantity)?;
    }
    if let Some(Some(cost)) = update.unit_cost {
        validate_cost(cost)?;
    }

    let txn = db.begin().await?;

    let item = EventItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let event_id = item.event_id;
    let prepared = update.prepared.unwrap_or(item.prepared);
    let sold = update.sold.unwrap_or(item.sold);
    let giveaway = update.giveaway.unwrap_or(item.giveaway);
    let unit_cost = update.unit_cost.unwrap_or(item.unit_cost);

    let flavor = crate::core::flavor::get_flavor_by_name(&txn, &item.flavor_name).await?;
    let unit_price =
        pricing::resolve_unit_price(flavor.map(|f| f.unit_price), config);

    let figures = pricing::derive_event_item(prepared, sold, giveaway, unit_price, unit_cost);

    let mut item: event_item::ActiveModel = item.into();
    item.prepared = Set(prepared);
    item.sold = Set(sold);
    item.giveaway = Set(giveaway);
    item.unit_cost = Set(unit_cost);
    item.remaining = Set(figures.remaining);
    item.revenue = Set(figures.revenue);
    item.cogs = Set(figures.cogs);
    item.profit = Set(figures.profit);

    let result = item.update(&txn).await?;

    crate::core::event::recalculate_event_totals(&txn, event_id).await?;

    txn.commit().await?;

    Ok(result)
}

/// Deletes a line item and recalculates the owning event's totals, in one
/// database transaction.
///
/// # Errors
/// Returns an error if the item does not exist or a database write fails.
pub async fn delete_event_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let item = EventItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let event_id = item.event_id;
    item.delete(&txn).await?;

    crate::core::event::recalculate_event_totals(&txn, event_id).await?;

    txn.commit().await?;
    Ok(())
}

/// Re-syncs a line item's cost snapshot to the catalog's current unit cost
/// for its flavor (the toggle-time half of the base-cost rule).
///
/// When the catalog has no flavor with a matching name, or the matching
/// flavor has no recorded cost, there is nothing to copy and the item is
/// returned unchanged. Switching *out* of base-cost mode is purely a caller
/// concern: the snapshot stays as-is until the next explicit edit.
///
/// # Errors
/// Returns an error if the item does not exist or a database write fails.
pub async fn apply_base_cost(
    db: &DatabaseConnection,
    item_id: i64,
    config: &PricingConfig,
) -> Result<event_item::Model> {
    let item = EventItem::find_by_id(item_id)
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

    update_event_item(
        db,
        item_id,
        EventItemUpdate {
            unit_cost: Some(Some(base_cost)),
            ..Default::default()
        },
        config,
    )
    .await
}
