//! Delivery item entity - one flavor's quantity and financials within a delivery.
//!
//! Both `unit_price` and `unit_cost` are snapshots taken when the item is
//! added (the price from the catalog, the cost from the catalog or a manual
//! override). Derived columns follow the delivery rule: everything prepared
//! counts as delivered-for-sale.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery line-item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the delivery this item belongs to
    pub delivery_id: i64,
    /// Flavor name snapshot; intentionally not a foreign key
    pub flavor_name: String,
    /// Units prepared and dropped off
    pub prepared: i32,
    /// Price-per-unit snapshot, None if the flavor had no catalog entry
    pub unit_price: Option<f64>,
    /// Cost-per-unit snapshot, None if unknown
    pub unit_cost: Option<f64>,
    /// Derived: `prepared * unit_price`, in dollars
    pub revenue: f64,
    /// Derived: `prepared * unit_cost` (0 when the cost is unknown), in dollars
    pub cogs: f64,
    /// Derived: `revenue - cogs`, in dollars
    pub profit: f64,
}

/// Defines relationships between DeliveryItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one delivery
    #[sea_orm(
        belongs_to = "super::delivery::Entity",
        from = "Column::DeliveryId",
        to = "super::delivery::Column::Id"
    )]
    Delivery,
}

impl Related<super::delivery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Delivery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
