//! Error types for container construction and presenter conversions.

use crate::value::ValueKind;
use thiserror::Error;

/// Errors that can occur while building or presenting a container.
#[derive(Error, Debug)]
pub enum StandardError {
    /// A map-shaped source was required (Collection / Object construction).
    #[error("expected a map-shaped value, found {found}")]
    NonMap { found: ValueKind },

    /// A sequence-shaped source was required (Array construction).
    #[error("expected a sequence-shaped value, found {found}")]
    NonSlice { found: ValueKind },

    /// The decode target of `ObjectPresenter::as_struct` is not a struct.
    #[error("target type `{target}` is not a struct")]
    NotRecord { target: &'static str },

    #[error("element {index} is {found}, which is not convertible to f64")]
    ElementNotF64 { index: usize, found: ValueKind },

    #[error("element {index} is {found}, which is not convertible to i64")]
    ElementNotI64 { index: usize, found: ValueKind },

    /// Also raised for negative signed integers.
    #[error("element {index} is {found}, which is not convertible to u64")]
    ElementNotU64 { index: usize, found: ValueKind },

    /// Malformed JSON input, a failed record decode, or a value that has no
    /// JSON encoding (non-finite float, opaque value).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout standard-objects.
pub type Result<T> = std::result::Result<T, StandardError>;
