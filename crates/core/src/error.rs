//! Error types for racksearch.

use racksearch_sheet::SheetError;
use thiserror::Error;

/// Result type for racksearch operations.
pub type RackResult<T> = Result<T, RackError>;

/// Errors that can occur in racksearch.
#[derive(Debug, Error)]
pub enum RackError {
    /// A configuration was saved without a sheet URL.
    #[error("Sheet URL must not be empty")]
    EmptySheetUrl,

    /// No sheet URL has been configured yet.
    #[error("No sheet URL configured")]
    NotConfigured,

    /// The configured sheet URL cannot be fetched.
    #[error("Invalid sheet URL: {0}")]
    InvalidSheetUrl(String),

    /// A search field name that is not one of the logical fields.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Admin secret mismatch. The message never says why.
    #[error("access denied")]
    AccessDenied,

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Fetched data could not be read as a table.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RackError {
    /// Whether this error means the sheet could not be loaded, as opposed to
    /// a problem with the request itself.
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured | Self::InvalidSheetUrl(_) | Self::Http(_) | Self::Sheet(_)
        )
    }
}
