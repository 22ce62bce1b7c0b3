//! Core shared library for the annotation sanity checker.
//!
//! This crate exposes the primitives the rule engine and the command line
//! depend on: the canonical error type, environment configuration, logging
//! setup and JSON helpers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{CheckerConfig, OutputFormat};
pub use errors::{ConfigError, Result as CoreResult, SanityError};
