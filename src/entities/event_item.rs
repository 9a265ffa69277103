//! Event item entity - one flavor's quantities and financials within an event.
//!
//! `flavor_name` and `unit_cost` are snapshots copied from the catalog when
//! the item is created (or when the user re-syncs to the base cost); later
//! catalog edits do not touch existing items. `remaining`, `revenue`, `cogs`,
//! and `profit` are derived from the quantity fields by the pricing
//! calculator and rewritten on every edit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event line-item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the event this item belongs to
    pub event_id: i64,
    /// Flavor name snapshot; intentionally not a foreign key
    pub flavor_name: String,
    /// Units brought to the event
    pub prepared: i32,
    /// Derived: `max(0, prepared - sold - giveaway)`
    pub remaining: i32,
    /// Units given away for free
    pub giveaway: i32,
    /// Units sold
    pub sold: i32,
    /// Derived: `sold * unit_price`, in dollars
    pub revenue: f64,
    /// Cost-per-unit snapshot, None if unknown
    pub unit_cost: Option<f64>,
    /// Derived: `sold * unit_cost` (0 when the cost is unknown), in dollars
    pub cogs: f64,
    /// Derived: `revenue - cogs`, in dollars
    pub profit: f64,
}

/// Defines relationships between EventItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
