//! Derived-field calculator - per-line-item pricing math.
//!
//! Everything in this module is a pure function of its inputs: given the
//! quantity fields and the resolved unit price/cost, it produces the derived
//! figures (`remaining`, `revenue`, `cogs`, `profit`) that get written back
//! onto the line item. No I/O, no hidden state - two calls with identical
//! inputs always produce identical outputs, which is what lets the engine
//! re-derive a row any number of times without drift.

use serde::Deserialize;

/// Fallback selling price when a line item's flavor has no catalog match.
pub const DEFAULT_UNIT_PRICE: f64 = 5.0;

/// Pricing defaults, loadable from the `[pricing]` section of config.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Unit price used when the catalog has no entry for a flavor name
    #[serde(default = "default_unit_price")]
    pub default_unit_price: f64,
}

fn default_unit_price() -> f64 {
    DEFAULT_UNIT_PRICE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}

/// Derived figures for an event line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventItemFigures {
    /// Units left over: `max(0, prepared - sold - giveaway)`
    pub remaining: i32,
    /// `sold * unit_price`, in dollars
    pub revenue: f64,
    /// `sold * unit_cost`, 0 when the cost is unknown, in dollars
    pub cogs: f64,
    /// `revenue - cogs`, in dollars
    pub profit: f64,
}

/// Derived figures for a delivery line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryItemFigures {
    /// `prepared * unit_price`, in dollars
    pub revenue: f64,
    /// `prepared * unit_cost`, 0 when the cost is unknown, in dollars
    pub cogs: f64,
    /// `revenue - cogs`, in dollars
    pub profit: f64,
}

/// Resolves the effective unit price for a line item.
///
/// `catalog_price` is the price found by looking the flavor up by name, or
/// None when the catalog has no match. A missing match falls back to the
/// configured default instead of failing - an item for a retired or
/// misspelled flavor still prices rather than erroring.
#[must_use]
pub fn resolve_unit_price(catalog_price: Option<f64>, config: &PricingConfig) -> f64 {
    catalog_price.unwrap_or(config.default_unit_price)
}

/// Computes the derived fields for an event line item.
///
/// `remaining` clips to zero: selling or giving away more than was prepared
/// is recorded as-is and simply leaves nothing remaining, it is not an error.
/// An unknown unit cost yields zero COGS, so profit equals revenue.
#[must_use]
pub fn derive_event_item(
    prepared: i32,
    sold: i32,
    giveaway: i32,
    unit_price: f64,
    unit_cost: Option<f64>,
) -> EventItemFigures {
    let remaining = (prepared - sold - giveaway).max(0);
    let revenue = f64::from(sold) * unit_price;
    let cogs = unit_cost.map_or(0.0, |cost| f64::from(sold) * cost);
    let profit = revenue - cogs;

    EventItemFigures {
        remaining,
        revenue,
        cogs,
        profit,
    }
}

/// Computes the derived fields for a delivery line item.
///
/// Deliveries have no sold/giveaway split - every prepared unit counts as
/// delivered-for-sale, so revenue and COGS scale with `prepared`.
#[must_use]
pub fn derive_delivery_item(
    prepared: i32,
    unit_price: f64,
    unit_cost: Option<f64>,
) -> DeliveryItemFigures {
    let revenue = f64::from(prepared) * unit_price;
    let cogs = unit_cost.map_or(0.0, |cost| f64::from(prepared) * cost);
    let profit = revenue - cogs;

    DeliveryItemFigures {
        revenue,
        cogs,
        profit,
    }
}
