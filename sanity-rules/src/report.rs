use serde::Serialize;

/// A rule whose condition held but whose requirement did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule_id: String,
    pub message: String,
}

/// Aggregated outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Violations in rule configuration order.
    pub violations: Vec<Violation>,
    pub rules_evaluated: usize,
    pub rules_matched: usize,
    /// Rules skipped because their condition referenced an absent attribute.
    pub rules_skipped_absent: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_violation(&mut self, rule_id: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            rule_id: rule_id.into(),
            message: message.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations
            .iter()
            .map(|violation| violation.message.as_str())
    }

    /// Violations raised by one rule.
    pub fn violations_for<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.rule_id == rule_id)
    }
}

/// Report for one paper of an editor export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperReport {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Excluded papers are not checked and carry an empty report.
    pub excluded: bool,
    pub report: ValidationReport,
}

impl PaperReport {
    pub fn is_clean(&self) -> bool {
        self.report.is_clean()
    }
}
