//! Consistency rules for paper annotation records.
//!
//! An annotation record maps questionnaire attributes to the answers given
//! for one paper. Rules are declarative condition/requirement pairs loaded
//! from JSON or YAML documents; a rule is violated when its condition holds
//! and its requirement does not. A condition that needs an absent attribute
//! skips the rule, while a requirement that needs one is violated.

mod answer;
mod condition;
mod defaults;
mod engine;
mod error;
mod loader;
mod record;
mod report;
mod rule;
mod template;

pub use answer::{option_label, Answer};
pub use condition::{FieldPath, RuleCondition, Truth};
pub use defaults::default_rules;
pub use engine::{DocumentReport, RuleEngine};
pub use error::{RecordError, RuleError};
pub use loader::load_rules;
pub use record::{AnnotationRecord, PaperEntry, PaperInfo, RecordDocument};
pub use report::{PaperReport, ValidationReport, Violation};
pub use rule::{Rule, RuleVerdict};
pub use template::render_message;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evaluates_simple_rule() {
        let rule = Rule::new(
            "code-unavailable",
            RuleCondition::Equals {
                field: FieldPath::from("Code available"),
                value: json!(false),
            },
            RuleCondition::Equals {
                field: FieldPath::from("Explainability"),
                value: json!("Pseudo-code"),
            },
            "Explainability must be 'Pseudo-code'",
        );

        let engine = RuleEngine::new(vec![rule]);
        let record = AnnotationRecord::from_value(
            &json!({"Code available": false, "Explainability": "Full"}),
            "paper.json",
        )
        .expect("record");
        let report = engine.validate(&record);

        assert_eq!(
            report.violations,
            vec![Violation {
                rule_id: "code-unavailable".into(),
                message: "Explainability must be 'Pseudo-code'".into(),
            }]
        );
    }
}
