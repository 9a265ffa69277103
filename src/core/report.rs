//! Report generation business logic.
//!
//! Derived metrics over events and deliveries: sell-through, margins, and
//! the consignment invoice math. Everything here is read-only and
//! framework-agnostic - functions return structured data for whatever
//! surface ends up formatting it.

use crate::{
    entities::{delivery, delivery_item, event, event_item},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Performance summary for a single event.
#[derive(Debug, Clone)]
pub struct EventReport {
    /// The event being reported on
    pub event: event::Model,
    /// Its line items, in insertion order
    pub items: Vec<event_item::Model>,
    /// Units sold as a percentage of units prepared
    pub sell_through_percent: f64,
    /// Net profit as a percentage of revenue
    pub profit_margin_percent: f64,
    /// Cash + Venmo + other payments recorded for the event
    pub total_collected: f64,
    /// Revenue not yet matched by recorded payments
    pub outstanding: f64,
}

/// Invoice summary for a single delivery.
#[derive(Debug, Clone)]
pub struct DeliveryInvoice {
    /// The delivery being invoiced
    pub delivery: delivery::Model,
    /// Its line items, in insertion order
    pub items: Vec<delivery_item::Model>,
    /// `total_revenue + additional_fees - discount`
    pub invoice_total: f64,
    /// `invoice_total - prepaid_amount`
    pub amount_due: f64,
}

/// Units sold as a percentage of units prepared (0 when nothing was prepared).
#[must_use]
pub fn sell_through_rate(sold: i32, prepared: i32) -> f64 {
    if prepared == 0 {
        return 0.0;
    }

    (f64::from(sold) / f64::from(prepared)) * 100.0
}

/// Profit as a percentage of revenue (0 when there is no revenue).
#[must_use]
pub fn profit_margin(profit: f64, revenue: f64) -> f64 {
    if revenue <= 0.0 {
        return 0.0;
    }

    (profit / revenue) * 100.0
}

/// Formats a dollar amount for display, e.g. `$50.00` or `-$25.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Generates a performance report for an event.
///
/// # Errors
/// Returns [`crate::errors::Error::EventNotFound`] if no event with the
/// given id exists.
pub async fn generate_event_report(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<EventReport> {
    let (event, items) = crate::core::event::get_event_with_items(db, event_id).await?;

    let sell_through_percent = sell_through_rate(event.total_sold, event.total_prepared);
    let profit_margin_percent = profit_margin(event.net_profit, event.total_revenue);
    let total_collected = event.cash_collected + event.venmo_collected + event.other_collected;
    let outstanding = event.total_revenue - total_collected;

    Ok(EventReport {
        event,
        items,
        sell_through_percent,
        profit_margin_percent,
        total_collected,
        outstanding,
    })
}

/// Generates the invoice summary for a delivery.
///
/// # Errors
/// Returns [`crate::errors::Error::DeliveryNotFound`] if no delivery with
/// the given id exists.
pub async fn generate_delivery_invoice(
    db: &DatabaseConnection,
    delivery_id: i64,
) -> Result<DeliveryInvoice> {
    let (delivery, items) =
        crate::core::delivery::get_delivery_with_items(db, delivery_id).await?;

    let invoice_total = delivery.total_revenue + delivery.additional_fees - delivery.discount;
    let amount_due = invoice_total - delivery.prepaid_amount;

    Ok(DeliveryInvoice {
        delivery,
        items,
        invoice_total,
        amount_due,
    })
}
