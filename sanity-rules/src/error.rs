use std::path::PathBuf;

use sanity_core::SanityError;
use thiserror::Error;

/// Errors returned by the rules engine when loading rule configurations.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rules path does not exist: {0}")]
    MissingPath(String),
    #[error("failed to read rules from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rules from {path}: {message}")]
    Parse { path: String, message: String },
    #[error("duplicate rule identifier detected in {path}: {id}")]
    DuplicateRule { path: String, id: String },
}

impl RuleError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RuleError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }

    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        RuleError::Parse {
            path: path.into().display().to_string(),
            message: message.into(),
        }
    }

    /// Path of the configuration that failed to load.
    pub fn path(&self) -> &str {
        match self {
            RuleError::MissingPath(path) => path,
            RuleError::Io { path, .. } => path,
            RuleError::Parse { path, .. } => path,
            RuleError::DuplicateRule { path, .. } => path,
        }
    }

    fn reason(&self) -> String {
        match self {
            RuleError::MissingPath(_) => "file does not exist".to_string(),
            RuleError::Io { source, .. } => source.to_string(),
            RuleError::Parse { message, .. } => message.clone(),
            RuleError::DuplicateRule { id, .. } => format!("duplicate rule identifier `{id}`"),
        }
    }
}

impl From<RuleError> for SanityError {
    fn from(err: RuleError) -> Self {
        SanityError::missing_configuration(err.path(), err.reason())
    }
}

/// Errors raised while reading an annotation record.
///
/// Each of these aborts validation before any rule runs.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to read record from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{source_name}: invalid JSON: {message}")]
    InvalidJson {
        source_name: String,
        message: String,
    },
    #[error("{source_name}: expected a JSON object, found {found}")]
    NotAnObject {
        source_name: String,
        found: &'static str,
    },
    #[error("{source_name}: attribute `{attribute}` has unexpected shape ({found})")]
    UnexpectedShape {
        source_name: String,
        attribute: String,
        found: String,
    },
    #[error("{source_name}: attribute `{attribute}` is answered more than once")]
    DuplicateAttribute {
        source_name: String,
        attribute: String,
    },
    #[error("{source_name}: paper `{key}` not found")]
    UnknownPaper { source_name: String, key: String },
}

impl RecordError {
    pub fn source_name(&self) -> &str {
        match self {
            RecordError::Io { path, .. } => path,
            RecordError::InvalidJson { source_name, .. }
            | RecordError::NotAnObject { source_name, .. }
            | RecordError::UnexpectedShape { source_name, .. }
            | RecordError::DuplicateAttribute { source_name, .. }
            | RecordError::UnknownPaper { source_name, .. } => source_name,
        }
    }
}

impl From<RecordError> for SanityError {
    fn from(err: RecordError) -> Self {
        let reason = match &err {
            RecordError::Io { source, .. } => source.to_string(),
            other => {
                let full = other.to_string();
                let prefix = format!("{}: ", other.source_name());
                full.strip_prefix(&prefix).map(str::to_string).unwrap_or(full)
            }
        };
        SanityError::malformed_record(err.source_name(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_become_missing_configuration() {
        let err: SanityError = RuleError::MissingPath("rules.json".into()).into();
        assert_eq!(
            err.to_string(),
            "rule configuration rules.json could not be loaded: file does not exist"
        );
    }

    #[test]
    fn record_errors_become_malformed_record() {
        let err: SanityError = RecordError::NotAnObject {
            source_name: "paper.json".into(),
            found: "an array",
        }
        .into();
        assert!(err.is_record_error());
        assert_eq!(
            err.to_string(),
            "malformed annotation record paper.json: expected a JSON object, found an array"
        );
    }
}
