//! Error types for the query crate.

use thiserror::Error;

/// Errors that can occur when building queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A search pattern could not be compiled.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A search term was empty after trimming.
    #[error("search text for field '{field}' is empty")]
    EmptySearch { field: String },
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
