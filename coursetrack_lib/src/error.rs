//! Error types for the pipeline layer.

use std::fmt;

/// Errors produced by the pipeline layer, wrapping host API failures and
/// adding storage, validation, export, and cancellation outcomes.
///
/// `Display` is the single human-readable summary surfaced to the user;
/// richer context goes to the tracing log at the failure site.
#[derive(Debug)]
pub enum Error {
    /// An error from the underlying host API client.
    Api(coursetrack_api::Error),
    /// The snapshot store failed to read or write.
    Storage(rusqlite::Error),
    /// Snapshot (de)serialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    Validation(String),
    /// The export sink rejected the report.
    Export(String),
    /// The operation was aborted through its cancellation token.
    Cancelled,
}

impl Error {
    /// True when the operation ended because the user aborted it, as
    /// opposed to failing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "host API error: {}", e),
            Self::Storage(e) => write!(f, "storage error: {}", e),
            Self::Serialization(e) => write!(f, "serialization error: {}", e),
            Self::Validation(msg) => write!(f, "invalid input: {}", msg),
            Self::Export(msg) => write!(f, "export error: {}", msg),
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<coursetrack_api::Error> for Error {
    fn from(e: coursetrack_api::Error) -> Self {
        match e {
            coursetrack_api::Error::Cancelled => Self::Cancelled,
            other => Self::Api(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
