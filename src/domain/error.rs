//! Error types for bulkbar.
//!
//! This module defines the crate-wide error type [`BulkbarError`] and a type alias
//! [`Result`] for convenient error handling. Errors specific to bulk-action
//! dispatch live next to the dispatcher in [`crate::bulk`], since they carry a
//! different meaning (caller bugs and recoverable operation failures).

use thiserror::Error;

/// The main error type for bulkbar operations outside of dispatch.
///
/// Most variants wrap underlying errors from external crates using `#[from]`
/// for automatic conversion.
///
/// # Examples
///
/// ```
/// use bulkbar::BulkbarError;
///
/// fn validate_config() -> Result<(), BulkbarError> {
///     Err(BulkbarError::Config("unknown context `invoices`".to_string()))
/// }
/// assert!(validate_config().is_err());
/// ```
#[derive(Debug, Error)]
pub enum BulkbarError {
    /// The data collaborator could not serve or accept a batch.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A batch fixture could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for bulkbar operations.
pub type Result<T> = std::result::Result<T, BulkbarError>;
