use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

const DEFAULT_PREFIX: &str = "SANITY_";

/// How the validation report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn parse(key: &str, raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected: "one of `text`, `json`",
            }),
        }
    }
}

/// Settings for a validation run taken from the process environment.
///
/// Command line flags take precedence over every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Rule configuration used when none is passed explicitly.
    pub rules_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    /// Report violations through a non-zero exit status.
    pub strict: bool,
    pub log_level: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            output_format: OutputFormat::Text,
            strict: false,
            log_level: "warn".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Loads configuration from `SANITY_*` variables, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix(DEFAULT_PREFIX)
    }

    /// Loads configuration from env vars prefixed with the provided value.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |key| match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
                key: key.to_string(),
            }),
        })
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(prefix: &str, mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Result<Option<String>, ConfigError>,
    {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);
        let defaults = Self::default();

        let rules_path = lookup(&key("RULES"))?
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        let format_key = key("FORMAT");
        let output_format = match lookup(&format_key)? {
            Some(raw) => OutputFormat::parse(&format_key, &raw)?,
            None => defaults.output_format,
        };

        let strict_key = key("STRICT");
        let strict = match lookup(&strict_key)? {
            Some(raw) => parse_bool(&strict_key, &raw)?,
            None => defaults.strict,
        };

        let log_level = lookup(&key("LOG"))?
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            rules_path,
            output_format,
            strict,
            log_level,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            expected: "a boolean",
        }),
    }
}
