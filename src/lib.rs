//! Sanity checks for research paper annotation records.
//!
//! Annotators fill in a fixed questionnaire per paper; the editor exports the
//! answers as JSON. This crate checks that the answers are consistent with
//! each other using declarative condition/requirement rules.
//!
//! # Architecture
//!
//! * `sanity-core`: shared error type, environment configuration, logging
//! * `sanity-rules`: record model, predicates, rule loading and evaluation
//! * `sanity-cli`: the `sanity-check` command line tool
//!
//! ```no_run
//! use sanity::{RecordDocument, RuleEngine};
//!
//! let engine = RuleEngine::with_default_rules()?;
//! let document = RecordDocument::from_path("export.json")?;
//! let report = engine.validate_document(&document);
//! println!("{} violation(s)", report.violation_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use sanity_core::{CheckerConfig, OutputFormat, SanityError};
pub use sanity_rules::{
    default_rules, load_rules, Answer, AnnotationRecord, DocumentReport, FieldPath, PaperEntry,
    PaperReport, RecordDocument, RecordError, Rule, RuleCondition, RuleEngine, RuleError,
    RuleVerdict, Truth, ValidationReport, Violation,
};

/// Validates a record file against an optional rule configuration.
///
/// Errors are the fatal kinds: an unloadable configuration or a malformed
/// record. Violations are data in the returned report.
pub fn check_file(
    record: impl AsRef<std::path::Path>,
    rules: Option<&std::path::Path>,
) -> Result<DocumentReport, SanityError> {
    let engine = RuleEngine::from_optional_path(rules)?;
    let document = RecordDocument::from_path(record)?;
    Ok(engine.validate_document(&document))
}
