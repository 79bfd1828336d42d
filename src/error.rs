//! Error types for the system monitor

use std::io;
use thiserror::Error;

/// Result type alias for sysmon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the strict (`try_*`) accessors and the CPU sampler.
///
/// The soft accessors never surface these; they log them and return a
/// zero-valued default instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file missing, unreadable, vanished process)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Expected key or field not present
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Two CPU samples showed no elapsed jiffies
    #[error("No jiffies elapsed between CPU samples")]
    NoElapsedJiffies,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the underlying resource could not be opened.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
