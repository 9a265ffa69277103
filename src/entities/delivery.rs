//! Delivery entity - a consignment drop-off to a store, invoiced separately.
//!
//! Unlike events, deliveries have no sold/giveaway split: every prepared unit
//! is treated as delivered-for-sale, so the derived totals come straight from
//! `prepared` quantities. `expiration_date` is derived from `date_prepared`
//! plus the shelf life and recomputed whenever the prep date changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::lifecycle::Lifecycle;

/// Delivery database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    /// Unique identifier for the delivery
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Store the goods were dropped off at
    pub store_name: String,
    /// Date the goods were prepared
    pub date_prepared: Date,
    /// Date of the drop-off, None until scheduled
    pub dropoff_date: Option<Date>,
    /// Derived: `date_prepared` plus shelf life
    pub expiration_date: Date,
    /// Derived: sum of `prepared` over line items
    pub total_prepared: i32,
    /// Derived: sum of `cogs` over line items, in dollars
    pub total_cogs: f64,
    /// Derived: sum of `revenue` over line items, in dollars
    pub total_revenue: f64,
    /// Derived: `total_revenue - total_cogs`, in dollars
    pub gross_profit: f64,
    /// Derived: `gross_profit / total_revenue` as a percentage, 0 when no revenue
    pub profit_margin: f64,
    /// Delivery or restocking fees added to the invoice, in dollars
    pub additional_fees: f64,
    /// Discount subtracted from the invoice, in dollars
    pub discount: f64,
    /// Amount the store already paid up front, in dollars
    pub prepaid_amount: f64,
    /// Cash payments collected, in dollars
    pub cash_collected: f64,
    /// Venmo payments collected, in dollars
    pub venmo_collected: f64,
    /// Other payments collected, in dollars
    pub other_collected: f64,
    /// Free-form notes, None if empty
    pub notes: Option<String>,
    /// Notes printed on the invoice, None if empty
    pub invoice_notes: Option<String>,
    /// Whether the delivery is active or archived
    pub lifecycle: Lifecycle,
    /// When the delivery was archived, None while active
    pub archived_at: Option<DateTimeUtc>,
    /// When the delivery was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Delivery and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One delivery has many line items
    #[sea_orm(has_many = "super::delivery_item::Entity")]
    DeliveryItems,
}

impl Related<super::delivery_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
