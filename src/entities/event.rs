//! Event entity - a single pop-up sale occasion.
//!
//! Each event owns a set of [`super::event_item`] rows, one per flavor sold.
//! The `total_*` and `net_profit` columns are derived: they always equal the
//! sums over the event's current line items and are overwritten by the
//! recalculation engine after every line-item mutation. Payment columns
//! (`cash_collected` and friends) are entered by hand and never derived.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::lifecycle::Lifecycle;

/// Event database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Farmers Market June")
    pub name: String,
    /// Calendar date the event takes place
    pub event_date: Date,
    /// Venue or address, None if not recorded
    pub location: Option<String>,
    /// Booth fee or other fixed cost of attending, in dollars
    pub event_cost: f64,
    /// Derived: sum of `prepared` over line items
    pub total_prepared: i32,
    /// Derived: sum of `sold` over line items
    pub total_sold: i32,
    /// Derived: sum of `giveaway` over line items
    pub total_giveaway: i32,
    /// Derived: sum of `revenue` over line items, in dollars
    pub total_revenue: f64,
    /// Derived: sum of `cogs` over line items, in dollars
    pub total_cost: f64,
    /// Derived: `total_revenue - total_cost`, in dollars
    pub net_profit: f64,
    /// Cash payments collected at the event, in dollars
    pub cash_collected: f64,
    /// Venmo payments collected at the event, in dollars
    pub venmo_collected: f64,
    /// Other payments (card, check) collected at the event, in dollars
    pub other_collected: f64,
    /// Free-form notes, None if empty
    pub notes: Option<String>,
    /// Whether the event is active or archived
    pub lifecycle: Lifecycle,
    /// When the event was archived, None while active
    pub archived_at: Option<DateTimeUtc>,
    /// When the event was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event has many line items
    #[sea_orm(has_many = "super::event_item::Entity")]
    EventItems,
}

impl Related<super::event_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
