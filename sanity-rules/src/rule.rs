use crate::condition::{RuleCondition, Truth};
use crate::record::AnnotationRecord;
use crate::template::render_message;
use serde::{Deserialize, Serialize};

/// Declarative consistency rule over an annotation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    /// Identifier used in reports. The loader fills in blanks.
    #[serde(default)]
    pub id: String,
    /// Optional human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the rule is active.
    #[serde(default = "Rule::default_enabled")]
    pub enabled: bool,
    /// Additional labels for reporting / filtering.
    #[serde(default)]
    pub labels: Vec<String>,
    /// When the rule applies.
    #[serde(default = "RuleCondition::always")]
    pub condition: RuleCondition,
    /// What must hold once the condition matched.
    pub requirement: RuleCondition,
    /// Violation message; `{Attribute}` placeholders are substituted.
    pub message: String,
}

/// Result of checking a single rule against a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleVerdict {
    /// The condition did not match.
    NotApplicable,
    /// The condition referenced an attribute the record lacks.
    SkippedAbsent { field: String },
    Passed,
    Violated { message: String },
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        condition: RuleCondition,
        requirement: RuleCondition,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: None,
            enabled: true,
            labels: Vec::new(),
            condition,
            requirement,
            message: message.into(),
        }
    }

    pub fn default_enabled() -> bool {
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Checks the rule. An absent attribute skips the rule when the condition
    /// needs it, but counts as a violation when the requirement needs it.
    pub fn check(&self, record: &AnnotationRecord) -> RuleVerdict {
        match self.condition.evaluate(record) {
            Truth::Fails => return RuleVerdict::NotApplicable,
            Truth::Absent(field) => {
                return RuleVerdict::SkippedAbsent {
                    field: field.as_str().to_string(),
                }
            }
            Truth::Holds => {}
        }

        if self.requirement.evaluate(record).holds() {
            RuleVerdict::Passed
        } else {
            RuleVerdict::Violated {
                message: render_message(&self.message, record),
            }
        }
    }
}
