//! Lifecycle state shared by parent records (events and deliveries).
//!
//! Parents move through an explicit tagged state instead of a nullable
//! timestamp: `Active` records show up in the normal lists, `Archived`
//! records are hidden but fully preserved, and a purged record is simply
//! gone from the database (along with its line items).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Visibility state of an event or delivery.
///
/// Legal transitions: `Active` → `Archived` (archive), `Archived` → `Active`
/// (restore). Purging is not a state; it removes the row and its children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Lifecycle {
    /// Visible in the active lists; the default for new records
    #[sea_orm(string_value = "active")]
    Active,
    /// Hidden from active lists, preserved with all line items
    #[sea_orm(string_value = "archived")]
    Archived,
}
