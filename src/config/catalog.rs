//! Catalog configuration loading from config.toml
//!
//! This module provides functionality to load pricing defaults and the
//! initial flavor catalog from a TOML configuration file. The flavors
//! defined in config.toml are used to seed the database on first run or
//! when flavors are missing.

use crate::core::pricing::PricingConfig;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Pricing defaults for the derived-field calculator
    #[serde(default)]
    pub pricing: PricingConfig,
    /// List of flavors to seed the catalog with
    #[serde(default)]
    pub flavors: Vec<FlavorSeed>,
}

/// Configuration for a single catalog flavor
#[derive(Debug, Deserialize, Clone)]
pub struct FlavorSeed {
    /// Name of the flavor
    pub name: String,
    /// Selling price per unit in dollars
    pub unit_price: f64,
    /// Cost per unit in dollars, omitted when unknown
    pub unit_cost: Option<f64>,
    /// Whether the flavor is offered for new line items
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

/// Loads catalog configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads catalog configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
