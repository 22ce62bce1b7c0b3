use std::io;

use thiserror::Error;

/// Result type used across the sanity checker crates.
pub type Result<T> = std::result::Result<T, SanityError>;

/// Canonical fatal error for a validation run.
///
/// Crate-local errors (rule loading, record parsing) convert into this type
/// at the crate boundary. Every variant aborts the run before a report is
/// produced.
#[derive(Debug, Error)]
pub enum SanityError {
    #[error("malformed annotation record {source_name}: {reason}")]
    MalformedRecord { source_name: String, reason: String },

    #[error("rule configuration {source_name} could not be loaded: {reason}")]
    MissingConfiguration { source_name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl SanityError {
    pub fn malformed_record(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SanityError::MalformedRecord {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_configuration(
        source_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SanityError::MissingConfiguration {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the annotation record input.
    pub fn is_record_error(&self) -> bool {
        matches!(self, SanityError::MalformedRecord { .. })
    }
}

impl From<serde_json::Error> for SanityError {
    fn from(err: serde_json::Error) -> Self {
        SanityError::Serialization(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("environment variable {key} is not valid unicode")]
    NotUnicode { key: String },
}
