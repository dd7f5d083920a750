//! Fixtures
//!
//! YAML-backed fixture sets for plan catalogs and product sets, loaded from
//! a base directory (`./fixtures` by default).

use thiserror::Error;

pub mod plans;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Monthly allowance outside the wire convention (`-1` or a non-negative count)
    #[error("Invalid monthly allowance: {0}")]
    InvalidAllowance(i64),

    /// Plan tier not found
    #[error("Plan not found: {0}")]
    PlanNotFound(String),
}
