use std::path::Path;

use tracing::{debug, info};

use crate::defaults::default_rules;
use crate::error::RuleError;
use crate::loader::load_rules;
use crate::record::{AnnotationRecord, PaperEntry, RecordDocument};
use crate::report::{PaperReport, ValidationReport};
use crate::rule::{Rule, RuleVerdict};

/// Runtime executor that checks annotation records against a rule set.
#[derive(Debug, Default, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

/// Outcome of validating a [`RecordDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentReport {
    Record(ValidationReport),
    Papers(Vec<PaperReport>),
}

impl DocumentReport {
    pub fn is_clean(&self) -> bool {
        match self {
            DocumentReport::Record(report) => report.is_clean(),
            DocumentReport::Papers(papers) => papers.iter().all(PaperReport::is_clean),
        }
    }

    pub fn violation_count(&self) -> usize {
        match self {
            DocumentReport::Record(report) => report.violations.len(),
            DocumentReport::Papers(papers) => papers
                .iter()
                .map(|paper| paper.report.violations.len())
                .sum(),
        }
    }
}

impl RuleEngine {
    /// Construct an engine from rules, evaluated in the given order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Engine with the built-in sanity checks.
    pub fn with_default_rules() -> Result<Self, RuleError> {
        Ok(Self::new(default_rules()?))
    }

    /// Loads rules from the given path (file or directory).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let rules = load_rules(path)?;
        Ok(Self::new(rules))
    }

    /// Loads from `path` when given, otherwise uses the built-in rules.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, RuleError> {
        match path {
            Some(path) => {
                let engine = Self::from_path(path)?;
                info!(path = %path.display(), rules = engine.rules.len(), "using rule configuration");
                Ok(engine)
            }
            None => {
                let engine = Self::with_default_rules()?;
                info!(rules = engine.rules.len(), "using built-in rules");
                Ok(engine)
            }
        }
    }

    /// Borrow the underlying rule set.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether the engine contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every enabled rule against the record.
    ///
    /// Rules are independent: a violation never stops the remaining rules.
    pub fn validate(&self, record: &AnnotationRecord) -> ValidationReport {
        let mut report = ValidationReport::new();

        for rule in &self.rules {
            if !rule.is_enabled() {
                continue;
            }
            report.rules_evaluated += 1;

            match rule.check(record) {
                RuleVerdict::NotApplicable => {}
                RuleVerdict::SkippedAbsent { field } => {
                    debug!(rule_id = %rule.id, %field, "condition attribute absent, rule skipped");
                    report.rules_skipped_absent += 1;
                }
                RuleVerdict::Passed => {
                    debug!(rule_id = %rule.id, "rule matched record and passed");
                    report.rules_matched += 1;
                }
                RuleVerdict::Violated { message } => {
                    debug!(rule_id = %rule.id, "rule violated");
                    report.rules_matched += 1;
                    report.push_violation(rule.id.clone(), message);
                }
            }
        }

        report
    }

    /// Validate one paper of an editor export, skipping excluded papers.
    pub fn validate_paper(&self, paper: &PaperEntry) -> PaperReport {
        let report = if paper.excluded {
            debug!(paper = %paper.key, "paper excluded from full text review, not checked");
            ValidationReport::new()
        } else {
            self.validate(&paper.record)
        };

        PaperReport {
            key: paper.key.clone(),
            title: paper.paper.title.clone(),
            excluded: paper.excluded,
            report,
        }
    }

    pub fn validate_document(&self, document: &RecordDocument) -> DocumentReport {
        match document {
            RecordDocument::Record(record) => DocumentReport::Record(self.validate(record)),
            RecordDocument::Papers(papers) => DocumentReport::Papers(
                papers.iter().map(|paper| self.validate_paper(paper)).collect(),
            ),
        }
    }
}
