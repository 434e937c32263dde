//! Domain error types for the MedVest client core.
//!
//! Validation failures are never represented here: they live in form state
//! as per-field messages. These errors cover misuse of the APIs and
//! failures reported by injected collaborators.

use thiserror::Error;

/// Errors raised by the form engine.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Invalid value for field {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Form values must serialize to an object, got {0}")]
    NotAnObject(&'static str),

    #[error("Submit handler failed: {0}")]
    Submit(#[source] anyhow::Error),
}

/// Errors raised by the paginated query layer.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Page fetch failed for page {page}: {source}")]
    FetchFailed {
        page: u32,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors raised by the local key-value storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stored value for key {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Store operation failed: {0}")]
    OperationFailed(#[from] anyhow::Error),
}

/// Unified error for session-level operations that span several concerns.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
