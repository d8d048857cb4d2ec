//! Error types for gematria_core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
///
/// Nothing here is fatal to a corpus scan: the engine logs and skips the
/// unit that produced the error.
#[derive(Error, Debug)]
pub enum Error {
    /// A verse or chapter record is missing expected fields
    #[error("Malformed unit {unit}: {reason}")]
    MalformedUnit { unit: String, reason: String },

    /// The provider could not deliver a unit within the retry bound
    #[error("Could not fetch {unit} after {attempts} attempts: {reason}")]
    Fetch {
        unit: String,
        attempts: u32,
        reason: String,
    },

    /// Reference or parsha range did not parse
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Rejected configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary snapshot encode/decode error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl Error {
    /// Create a malformed unit error
    pub fn malformed(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedUnit {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() != std::io::ErrorKind::NotFound)
    }
}
