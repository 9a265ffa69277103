//! Flavor entity - the product catalog.
//!
//! A flavor is a sellable product definition: name, unit price, and an
//! optional unit cost. Line items reference flavors by *name snapshot*, not
//! by foreign key, so catalog edits never rewrite historical records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flavor database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flavors")]
pub struct Model {
    /// Unique identifier for the flavor
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Vanilla Bean"); line items copy this string
    pub name: String,
    /// Current selling price per unit in dollars
    pub unit_price: f64,
    /// Current cost per unit in dollars, None if never measured
    pub unit_cost: Option<f64>,
    /// Whether the flavor is offered for new line items
    pub is_active: bool,
    /// When the flavor was added to the catalog
    pub created_at: DateTimeUtc,
}

/// Flavors are referenced by name snapshot only, so they relate to nothing.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
