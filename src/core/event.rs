//! Event business logic.
//!
//! Provides functions for creating, retrieving, updating, and managing
//! pop-up sale events, including the totals-recalculation engine that keeps
//! an event's denormalized aggregate columns equal to the sums over its
//! current line items. The derived columns are never written by anything
//! except [`recalculate_event_totals`]; parent-field updates leave them
//! alone entirely.

use crate::{
    entities::{Event, EventItem, Lifecycle, event, event_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Partial update for an event's hand-entered fields. `None` leaves a field
/// unchanged; for nullable columns, `Some(None)` clears the stored value.
/// Derived totals are deliberately absent - they belong to the
/// recalculation engine.
#[derive(Debug, Default, Clone)]
pub struct EventUpdate {
    /// New event name
    pub name: Option<String>,
    /// New event date
    pub event_date: Option<NaiveDate>,
    /// New venue (`Some(None)` clears it)
    pub location: Option<Option<String>>,
    /// New fixed cost of attending
    pub event_cost: Option<f64>,
    /// Cash collected at the event
    pub cash_collected: Option<f64>,
    /// Venmo collected at the event
    pub venmo_collected: Option<f64>,
    /// Other payments collected at the event
    pub other_collected: Option<f64>,
    /// New notes (`Some(None)` clears them)
    pub notes: Option<Option<String>>,
}

fn validate_money(amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Creates a new event with zeroed totals and payment fields.
///
/// # Errors
/// Returns an error if the name is empty, the event cost is negative or not
/// finite, or the database insert fails.
pub async fn create_event(
    db: &DatabaseConnection,
    name: String,
    event_date: NaiveDate,
    location: Option<String>,
    event_cost: f64,
    notes: Option<String>,
) -> Result<event::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Event name cannot be empty".to_string(),
        });
    }
    validate_money(event_cost)?;

    let event = event::ActiveModel {
        name: Set(name.trim().to_string()),
        event_date: Set(event_date),
        location: Set(location),
        event_cost: Set(event_cost),
        total_prepared: Set(0),
        total_sold: Set(0),
        total_giveaway: Set(0),
        total_revenue: Set(0.0),
        total_cost: Set(0.0),
        net_profit: Set(0.0),
        cash_collected: Set(0.0),
        venmo_collected: Set(0.0),
        other_collected: Set(0.0),
        notes: Set(notes),
        lifecycle: Set(Lifecycle::Active),
        archived_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    event.insert(db).await.map_err(Into::into)
}

/// Finds an event by its unique ID, archived or not.
pub async fn get_event_by_id(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<event::Model>> {
    Event::find_by_id(event_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads an event together with all of its line items.
///
/// This is the read path the caller uses to refresh its view after a
/// mutation: the parent row carries the freshly recalculated totals and the
/// items carry the per-flavor breakdown.
///
/// # Errors
/// Returns [`Error::EventNotFound`] if no event with the given id exists.
pub async fn get_event_with_items(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<(event::Model, Vec<event_item::Model>)> {
    let event = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let items = crate::core::event_item::get_items_for_event(db, event_id).await?;

    Ok((event, items))
}

/// Retrieves all active events, newest event date first.
pub async fn list_active_events(db: &DatabaseConnection) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::Lifecycle.eq(Lifecycle::Active))
        .order_by_desc(event::Column::EventDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all archived events, newest event date first.
pub async fn list_archived_events(db: &DatabaseConnection) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::Lifecycle.eq(Lifecycle::Archived))
        .order_by_desc(event::Column::EventDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to an event's hand-entered fields.
///
/// Derived totals cannot be set through this path; they are recomputed from
/// line items only.
///
/// # Errors
/// Returns an error if the event does not exist, a supplied value fails
/// validation, or the database update fails.
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: i64,
    update: EventUpdate,
) -> Result<event::Model> {
    if let Some(ref name) = update.name {
        if name.trim().is_empty() {
            return Err(Error::Config {
                message: "Event name cannot be empty".to_string(),
            });
        }
    }
    for amount in [
        update.event_cost,
        update.cash_collected,
        update.venmo_collected,
        update.other_collected,
    ]
    .into_iter()
    .flatten()
    {
        validate_money(amount)?;
    }

    let mut event: event::ActiveModel = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?
        .into();

    if let Some(name) = update.name {
        event.name = Set(name.trim().to_string());
    }
    if let Some(date) = update.event_date {
        event.event_date = Set(date);
    }
    if let Some(location) = update.location {
        event.location = Set(location);
    }
    if let Some(cost) = update.event_cost {
        event.event_cost = Set(cost);
    }
    if let Some(cash) = update.cash_collected {
        event.cash_collected = Set(cash);
    }
    if let Some(venmo) = update.venmo_collected {
        event.venmo_collected = Set(venmo);
    }
    if let Some(other) = update.other_collected {
        event.other_collected = Set(other);
    }
    if let Some(notes) = update.notes {
        event.notes = Set(notes);
    }

    event.update(db).await.map_err(Into::into)
}

/// Archives an active event (Active → Archived), hiding it from the active
/// list while preserving it and its line items.
///
/// # Errors
/// Returns an error if the event does not exist or is already archived.
pub async fn archive_event(db: &DatabaseConnection, event_id: i64) -> Result<event::Model> {
    let event = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    if event.lifecycle == Lifecycle::Archived {
        return Err(Error::Config {
            message: format!("Event {event_id} is already archived"),
        });
    }

    let mut event: event::ActiveModel = event.into();
    event.lifecycle = Set(Lifecycle::Archived);
    event.archived_at = Set(Some(chrono::Utc::now()));

    event.update(db).await.map_err(Into::into)
}

/// Restores an archived event (Archived → Active).
///
/// # Errors
/// Returns an error if the event does not exist or is not archived.
pub async fn restore_event(db: &DatabaseConnection, event_id: i64) -> Result<event::Model> {
    let event = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    if event.lifecycle != Lifecycle::Archived {
        return Err(Error::Config {
            message: format!("Event {event_id} is not archived"),
        });
    }

    let mut event: event::ActiveModel = event.into();
    event.lifecycle = Set(Lifecycle::Active);
    event.archived_at = Set(None);

    event.update(db).await.map_err(Into::into)
}

/// Permanently deletes an event and all of its line items.
///
/// The event and its children are removed in one database transaction, so a
/// failure part-way leaves nothing half-deleted. Works from either lifecycle
/// state.
///
/// # Errors
/// Returns an error if the event does not exist or a delete fails.
pub async fn purge_event(db: &DatabaseConnection, event_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let event = Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    EventItem::delete_many()
        .filter(event_item::Column::EventId.eq(event_id))
        .exec(&txn)
        .await?;

    event.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Recalculates every derived aggregate column on an event from the current
/// full set of its line items and persists the overwrite.
///
/// Sums `prepared`, `sold`, `giveaway`, `revenue`, and `cogs` across the
/// items; `net_profit` is total revenue minus total cost. Whatever totals
/// the row held before are discarded - the parent never stores a figure
/// that is not derivable from its current children. Running this twice in a
/// row without an intervening item mutation yields identical results.
///
/// Generic over [`ConnectionTrait`] so line-item mutations can invoke it on
/// the same transaction as their own write.
///
/// # Errors
/// Returns [`Error::EventNotFound`] if no event with the given id exists.
pub async fn recalculate_event_totals<C>(db: &C, event_id: i64) -> Result<event::Model>
where
    C: ConnectionTrait,
{
    let event = Event::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let items = EventItem::find()
        .filter(event_item::Column::EventId.eq(event_id))
        .all(db)
        .await?;

    let total_prepared: i32 = items.iter().map(|i| i.prepared).sum();
    let total_sold: i32 = items.iter().map(|i| i.sold).sum();
    let total_giveaway: i32 = items.iter().map(|i| i.giveaway).sum();
    let total_revenue: f64 = items.iter().map(|i| i.revenue).sum();
    let total_cost: f64 = items.iter().map(|i| i.cogs).sum();
    let net_profit = total_revenue - total_cost;

    let mut event: event::ActiveModel = event.into();
    event.total_prepared = Set(total_prepared);
    event.total_sold = Set(total_sold);
    event.total_giveaway = Set(total_giveaway);
    event.total_revenue = Set(total_revenue);
    event.total_cost = Set(total_cost);
    event.net_profit = Set(net_profit);

    event.update(db).await.map_err(Into::into)
}

/// Recalculates totals for every event in the database, archived included.
///
/// Manual recovery path: repairs totals left stale by an interrupted write
/// or by data imported from systems without the single-transaction
/// guarantee. Returns the number of events processed.
pub async fn recalculate_all_event_totals(db: &DatabaseConnection) -> Result<usize> {
    let events = Event::find().all(db).await?;
    let count = events.len();

    for event in events {
        recalculate_event_totals(db, event.id).await?;
    }

    Ok(count)
}
