//! Error types for filter construction, validation and application.
//!
//! A filter that merely lacks arguments is *not* an error: it surfaces as a
//! [`MoreInput`](crate::MoreInput) from validation. Everything here is fatal
//! to the request except [`FilterError::MissingRadius`], which carries a
//! redirect target the caller may follow instead of failing.

use thiserror::Error;

use crate::place::PlaceError;

/// Errors raised while building or running a filter chain.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A specification segment had no `=`.
    #[error("invalid filter parameter '{segment}', no equals sign")]
    InvalidSegment { segment: String },

    /// The argument name matches no known filter prefix.
    #[error("invalid filter type '{arg}'")]
    InvalidFilterType { arg: String },

    /// `by-<slug>` named a field the schema does not have.
    #[error("invalid field slug '{slug}'")]
    UnknownField { slug: String },

    /// `by-<slug>` named a field that is already filtered in this chain.
    #[error("field '{slug}' is already filtered")]
    FieldAlreadyFiltered { slug: String },

    /// A second filter was inserted under an occupied key.
    #[error("duplicate filter for '{key}'")]
    DuplicateFilter { key: String },

    #[error("invalid boolean value '{value}'")]
    InvalidBoolean { value: String },

    #[error("no such lookup '{slug}' for field '{field}'")]
    NoSuchLookup { field: String, slug: String },

    #[error("missing or invalid date range '{value}'")]
    InvalidDateRange { value: String },

    #[error("invalid block range '{value}'")]
    InvalidBlockRange { value: String },

    #[error("invalid block radius '{value}'")]
    InvalidRadius { value: String },

    /// Required positional arguments were absent.
    #[error("not enough args for '{arg}'")]
    NotEnoughArgs { arg: String },

    #[error("text search on '{field}' requires search text")]
    MissingSearchText { field: String },

    /// Recoverable: the block radius was omitted. `redirect` is the same
    /// request with the default radius filled in.
    #[error("missing radius, try {redirect}")]
    MissingRadius { redirect: String },

    /// An incomplete filter has nothing to offer as candidates.
    #[error("empty lookup list for '{slug}'")]
    EmptyCandidates { slug: String },

    /// `apply` was called on a filter that never received its arguments.
    #[error("filter '{arg}' is incomplete and cannot be applied")]
    Incomplete { arg: String },

    #[error(transparent)]
    Place(#[from] PlaceError),

    #[error(transparent)]
    Query(#[from] schemafilter_query::QueryError),
}

impl FilterError {
    /// Returns `true` if the caller may redirect instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FilterError::MissingRadius { .. })
    }

    /// Suggested redirect target for recoverable errors.
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            FilterError::MissingRadius { redirect } => Some(redirect),
            _ => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, FilterError::DuplicateFilter { .. })
    }

    pub(crate) fn not_enough_args(arg: impl Into<String>) -> Self {
        FilterError::NotEnoughArgs { arg: arg.into() }
    }
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
