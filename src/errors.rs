//! Unified error types and result handling for `BakeTracker`.
//!
//! Every fallible operation in the crate returns [`Result`], so callers deal
//! with a single error enum regardless of whether the failure came from
//! validation, a missing record, or the database layer.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problem: unreadable config file, bad TOML, empty names, etc.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// A monetary amount failed validation (negative, NaN, or infinite).
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// A quantity failed validation (negative).
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i32,
    },

    /// No event with the given id exists.
    #[error("Event not found: {id}")]
    EventNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// No delivery with the given id exists.
    #[error("Delivery not found: {id}")]
    DeliveryNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// No flavor with the given id exists in the catalog.
    #[error("Flavor not found: {id}")]
    FlavorNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// No line item with the given id exists.
    #[error("Line item not found: {id}")]
    ItemNotFound {
        /// Id that was looked up
        id: i64,
    },

    /// The database layer reported a failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config file access and similar).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
