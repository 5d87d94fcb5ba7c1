//! Error types for the nutriboard application.

use std::path::PathBuf;

use thiserror::Error;

/// A field value the strict enum parsers did not recognize.
///
/// Only surfaced by `FromStr` impls; the assessment normalizer catches this
/// and substitutes the documented default instead of propagating it.
#[derive(Debug, Error)]
#[error("unrecognized {field} value: {value}")]
pub struct UnrecognizedValue {
    pub field: &'static str,
    pub value: String,
}

/// Errors that can occur when loading the food database file.
#[derive(Debug, Error)]
pub enum FoodDbError {
    #[error("food database not found: {0}")]
    FileNotFound(PathBuf),

    #[error("cannot read food database: {0}")]
    CannotRead(#[from] std::io::Error),

    #[error("invalid food database JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("food database category '{0}' is empty")]
    EmptyCategory(&'static str),

    #[error("food item in '{category}' has no name")]
    UnnamedItem { category: &'static str },
}
