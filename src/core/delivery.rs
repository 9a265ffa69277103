//! Delivery business logic.
//!
//! Consignment drop-offs mirror events: the same lifecycle states, the same
//! derived-totals discipline, plus two wrinkles of their own. The
//! expiration date is derived from the prep date and the shelf life, and the
//! recalculated aggregates include a profit margin percentage used by the
//! invoice.

use crate::{
    entities::{Delivery, DeliveryItem, Lifecycle, delivery, delivery_item},
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Days between preparation and expiration of delivered goods.
pub const SHELF_LIFE_DAYS: i64 = 7;

/// Derives the expiration date from the preparation date.
#[must_use]
pub fn expiration_for(date_prepared: NaiveDate) -> NaiveDate {
    date_prepared + Duration::days(SHELF_LIFE_DAYS)
}

/// Partial update for a delivery's hand-entered fields. `None` leaves a
/// field unchanged; for nullable columns, `Some(None)` clears the stored
/// value. Changing `date_prepared` re-derives the expiration date. Derived
/// totals are deliberately absent.
#[derive(Debug, Default, Clone)]
pub struct DeliveryUpdate {
    /// New store name
    pub store_name: Option<String>,
    /// New preparation date (re-derives expiration)
    pub date_prepared: Option<NaiveDate>,
    /// New drop-off date (`Some(None)` clears it)
    pub dropoff_date: Option<Option<NaiveDate>>,
    /// Fees added to the invoice
    pub additional_fees: Option<f64>,
    /// Discount subtracted from the invoice
    pub discount: Option<f64>,
    /// Amount already paid up front
    pub prepaid_amount: Option<f64>,
    /// Cash collected
    pub cash_collected: Option<f64>,
    /// Venmo collected
    pub venmo_collected: Option<f64>,
    /// Other payments collected
    pub other_collected: Option<f64>,
    /// New notes (`Some(None)` clears them)
    pub notes: Option<Option<String>>,
    /// New invoice notes (`Some(None)` clears them)
    pub invoice_notes: Option<Option<String>>,
}

fn validate_money(amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Creates a new delivery with zeroed totals and a derived expiration date.
///
/// # Errors
/// Returns an error if the store name is empty or the database insert fails.
pub async fn create_delivery(
    db: &DatabaseConnection,
    store_name: String,
    date_prepared: NaiveDate,
    dropoff_date: Option<NaiveDate>,
    notes: Option<String>,
) -> Result<delivery::Model> {
    if store_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Store name cannot be empty".to_string(),
        });
    }

    let delivery = delivery::ActiveModel {
        store_name: Set(store_name.trim().to_string()),
        date_prepared: Set(date_prepared),
        dropoff_date: Set(dropoff_date),
        expiration_date: Set(expiration_for(date_prepared)),
        total_prepared: Set(0),
        total_cogs: Set(0.0),
        total_revenue: Set(0.0),
        gross_profit: Set(0.0),
        profit_margin: Set(0.0),
        additional_fees: Set(0.0),
        discount: Set(0.0),
        prepaid_amount: Set(0.0),
        cash_collected: Set(0.0),
        venmo_collected: Set(0.0),
        other_collected: Set(0.0),
        notes: Set(notes),
        invoice_notes: Set(None),
        lifecycle: Set(Lifecycle::Active),
        archived_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    delivery.insert(db).await.map_err(Into::into)
}

/// Finds a delivery by its unique ID, archived or not.
pub async fn get_delivery_by_id(
    db: &DatabaseConnection,
    delivery_id: i64,
) -> Result<Option<delivery::Model>> {
    Delivery::find_by_id(delivery_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a delivery together with all of its line items.
///
/// # Errors
/// Returns [`Error::DeliveryNotFound`] if no delivery with the given id exists.
pub async fn get_delivery_with_items(
    db: &DatabaseConnection,
    delivery_id: i64,
) -> Result<(delivery::Model, Vec<delivery_item::Model>)> {
    let delivery = Delivery::find_by_id(delivery_id)
        .one(db)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?;

    let items = crate::core::delivery_item::get_items_for_delivery(db, delivery_id).await?;

    Ok((delivery, items))
}

/// Retrieves all active deliveries, newest prep date first.
pub async fn list_active_deliveries(db: &DatabaseConnection) -> Result<Vec<delivery::Model>> {
    Delivery::find()
        .filter(delivery::Column::Lifecycle.eq(Lifecycle::Active))
        .order_by_desc(delivery::Column::DatePrepared)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all archived deliveries, newest prep date first.
pub async fn list_archived_deliveries(db: &DatabaseConnection) -> Result<Vec<delivery::Model>> {
    Delivery::find()
        .filter(delivery::Column::Lifecycle.eq(Lifecycle::Archived))
        .order_by_desc(delivery::Column::DatePrepared)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a delivery's hand-entered fields.
///
/// Supplying a new `date_prepared` re-derives `expiration_date`; the
/// expiration can never be set directly.
///
/// # Errors
/// Returns an error if the delivery does not exist, a supplied value fails
/// validation, or the database update fails.
pub async fn update_delivery(
    db: &DatabaseConnection,
    delivery_id: i64,
    update: DeliveryUpdate,
) -> Result<delivery::Model> {
    if let Some(ref name) = update.store_name {
        if name.trim().is_empty() {
            return Err(Error::Config {
                message: "Store name cannot be empty".to_string(),
            });
        }
    }
    for amount in [
        update.additional_fees,
        update.discount,
        update.prepaid_amount,
        update.cash_collected,
        update.venmo_collected,
        update.other_collected,
    ]
    .into_iter()
    .flatten()
    {
        validate_money(amount)?;
    }

    let mut delivery: delivery::ActiveModel = Delivery::find_by_id(delivery_id)
        .one(db)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?
        .into();

    if let Some(name) = update.store_name {
        delivery.store_name = Set(name.trim().to_string());
    }
    if let Some(date) = update.date_prepared {
        delivery.date_prepared = Set(date);
        delivery.expiration_date = Set(expiration_for(date));
    }
    if let Some(dropoff) = update.dropoff_date {
        delivery.dropoff_date = Set(dropoff);
    }
    if let Some(fees) = update.additional_fees {
        delivery.additional_fees = Set(fees);
    }
    if let Some(discount) = update.discount {
        delivery.discount = Set(discount);
    }
    if let Some(prepaid) = update.prepaid_amount {
        delivery.prepaid_amount = Set(prepaid);
    }
    if let Some(cash) = update.cash_collected {
        delivery.cash_collected = Set(cash);
    }
    if let Some(venmo) = update.venmo_collected {
        delivery.venmo_collected = Set(venmo);
    }
    if let Some(other) = update.other_collected {
        delivery.other_collected = Set(other);
    }
    if let Some(notes) = update.notes {
        delivery.notes = Set(notes);
    }
    if let Some(invoice_notes) = update.invoice_notes {
        delivery.invoice_notes = Set(invoice_notes);
    }

    delivery.update(db).await.map_err(Into::into)
}

/// Archives an active delivery (Active → Archived).
///
/// # Errors
/// Returns an error if the delivery does not exist or is already archived.
pub async fn archive_delivery(
    db: &DatabaseConnection,
    delivery_id: i64,
) -> Result<delivery::Model> {
    let delivery = Delivery::find_by_id(delivery_id)
        .one(db)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?;

    if delivery.lifecycle == Lifecycle::Archived {
        return Err(Error::Config {
            message: format!("Delivery {delivery_id} is already archived"),
        });
    }

    let mut delivery: delivery::ActiveModel = delivery.into();
    delivery.lifecycle = Set(Lifecycle::Archived);
    delivery.archived_at = Set(Some(chrono::Utc::now()));

    delivery.update(db).await.map_err(Into::into)
}

/// Restores an archived delivery (Archived → Active).
///
/// # Errors
/// Returns an error if the delivery does not exist or is not archived.
pub async fn restore_delivery(
    db: &DatabaseConnection,
    delivery_id: i64,
) -> Result<delivery::Model> {
    let delivery = Delivery::find_by_id(delivery_id)
        .one(db)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?;

    if delivery.lifecycle != Lifecycle::Archived {
        return Err(Error::Config {
            message: format!("Delivery {delivery_id} is not archived"),
        });
    }

    let mut delivery: delivery::ActiveModel = delivery.into();
    delivery.lifecycle = Set(Lifecycle::Active);
    delivery.archived_at = Set(None);

    delivery.update(db).await.map_err(Into::into)
}

/// Permanently deletes a delivery and all of its line items in one database
/// transaction.
///
/// # Errors
/// Returns an error if the delivery does not exist or a delete fails.
pub async fn purge_delivery(db: &DatabaseConnection, delivery_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let delivery = Delivery::find_by_id(delivery_id)
        .one(&txn)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?;

    DeliveryItem::delete_many()
        .filter(delivery_item::Column::DeliveryId.eq(delivery_id))
        .exec(&txn)
        .await?;

    delivery.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Recalculates every derived aggregate column on a delivery from the
/// current full set of its line items and persists the overwrite.
///
/// Sums `prepared`, `revenue`, and `cogs`; `gross_profit` is revenue minus
/// COGS, and `profit_margin` is the gross profit as a percentage of revenue
/// (zero when there is no revenue). Generic over [`ConnectionTrait`] so
/// line-item mutations can invoke it on their own transaction.
///
/// # Errors
/// Returns [`Error::DeliveryNotFound`] if no delivery with the given id exists.
pub async fn recalculate_delivery_totals<C>(db: &C, delivery_id: i64) -> Result<delivery::Model>
where
    C: ConnectionTrait,
{
    let delivery = Delivery::find_by_id(delivery_id)
        .one(db)
        .await?
        .ok_or(Error::DeliveryNotFound { id: delivery_id })?;

    let items = DeliveryItem::find()
        .filter(delivery_item::Column::DeliveryId.eq(delivery_id))
        .all(db)
        .await?;

    let total_prepared: i32 = items.iter().map(|i| i.prepared).sum();
    let total_cogs: f64 = items.iter().map(|i| i.cogs).sum();
    let total_revenue: f64 = items.iter().map(|i| i.revenue).sum();
    let gross_profit = total_revenue - total_cogs;
    let profit_margin = if total_revenue > 0.0 {
        (gross_profit / total_revenue) * 100.0
    } else {
        0.0
    };

    let mut delivery: delivery::ActiveModel = delivery.into();
    delivery.total_prepared = Set(total_prepared);
    delivery.total_cogs = Set(total_cogs);
    delivery.total_revenue = Set(total_revenue);
    delivery.gross_profit = Set(gross_profit);
    delivery.profit_margin = Set(profit_margin);

    delivery.update(db).await.map_err(Into::into)
}

/// Recalculates totals for every delivery in the database, archived included.
///
/// Manual recovery path, the delivery half of the maintenance sweep.
/// Returns the number of deliveries processed.
pub async fn recalculate_all_delivery_totals(db: &DatabaseConnection) -> Result<usize> {
    let deliveries = Delivery::find().all(db).await?;
    let count = deliveries.len();

    for delivery in deliveries {
        recalculate_delivery_totals(db, delivery.id).await?;
    }

    Ok(count)
}
