/// Database configuration and connection management
pub mod database;

/// Catalog seeding and pricing defaults from config.toml
pub mod catalog;
