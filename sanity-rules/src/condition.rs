use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answer::Answer;
use crate::record::AnnotationRecord;

/// Name of an attribute in an annotation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn locate<'a>(&self, record: &'a AnnotationRecord) -> Option<&'a Answer> {
        record.get(&self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        FieldPath::new(value)
    }
}

impl From<String> for FieldPath {
    fn from(value: String) -> Self {
        FieldPath::new(value)
    }
}

/// Outcome of evaluating a predicate against a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Truth {
    Holds,
    Fails,
    /// The predicate needed an attribute the record does not have.
    Absent(FieldPath),
}

impl Truth {
    fn from_bool(value: bool) -> Self {
        if value {
            Truth::Holds
        } else {
            Truth::Fails
        }
    }

    pub fn holds(&self) -> bool {
        matches!(self, Truth::Holds)
    }
}

/// Predicate over an annotation record, used as a rule condition or requirement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Holds for every record.
    Always,
    /// All nested conditions must hold.
    All { conditions: Vec<RuleCondition> },
    /// Any of the nested conditions must hold.
    Any { conditions: Vec<RuleCondition> },
    /// Negate the nested condition. Absence is kept as absence.
    Not { condition: Box<RuleCondition> },
    /// The answer has exactly one selection and it matches `value`.
    Equals { field: FieldPath, value: Value },
    /// Negation of `equals` for a present attribute.
    NotEquals { field: FieldPath, value: Value },
    /// Some selection matches `value`.
    Contains { field: FieldPath, value: Value },
    /// Some selection matches one of `values`.
    ContainsAny { field: FieldPath, values: Vec<Value> },
    /// Every selection matches one of `values`.
    OneOf { field: FieldPath, values: Vec<Value> },
    /// No selection matches any of `values`.
    NoneOf { field: FieldPath, values: Vec<Value> },
    /// Some selection, or the free text attached to the attribute, contains a
    /// textual snippet.
    ContainsText { field: FieldPath, text: String },
    /// The attribute is present, possibly empty.
    Exists { field: FieldPath },
    /// The attribute is absent.
    Missing { field: FieldPath },
    /// The attribute is present with a non-blank selection.
    NonEmpty { field: FieldPath },
    /// The attribute is absent or has no non-blank selection.
    Empty { field: FieldPath },
}

impl RuleCondition {
    pub fn always() -> Self {
        RuleCondition::Always
    }

    /// Three-valued evaluation.
    ///
    /// Leaves on an absent attribute yield [`Truth::Absent`]; the presence
    /// checks (`exists`, `missing`, `non_empty`, `empty`) are total.
    pub fn evaluate(&self, record: &AnnotationRecord) -> Truth {
        match self {
            RuleCondition::Always => Truth::Holds,
            RuleCondition::All { conditions } => {
                let mut absent = None;
                for condition in conditions {
                    match condition.evaluate(record) {
                        Truth::Fails => return Truth::Fails,
                        Truth::Absent(field) => {
                            absent.get_or_insert(field);
                        }
                        Truth::Holds => {}
                    }
                }
                absent.map(Truth::Absent).unwrap_or(Truth::Holds)
            }
            RuleCondition::Any { conditions } => {
                let mut absent = None;
                for condition in conditions {
                    match condition.evaluate(record) {
                        Truth::Holds => return Truth::Holds,
                        Truth::Absent(field) => {
                            absent.get_or_insert(field);
                        }
                        Truth::Fails => {}
                    }
                }
                absent.map(Truth::Absent).unwrap_or(Truth::Fails)
            }
            RuleCondition::Not { condition } => match condition.evaluate(record) {
                Truth::Holds => Truth::Fails,
                Truth::Fails => Truth::Holds,
                absent => absent,
            },
            RuleCondition::Equals { field, value } => with_answer(field, record, |answer| {
                answer.equals(value)
            }),
            RuleCondition::NotEquals { field, value } => with_answer(field, record, |answer| {
                !answer.equals(value)
            }),
            RuleCondition::Contains { field, value } => with_answer(field, record, |answer| {
                answer.contains(value)
            }),
            RuleCondition::ContainsAny { field, values } => {
                with_answer(field, record, |answer| answer.contains_any(values))
            }
            RuleCondition::OneOf { field, values } => {
                with_answer(field, record, |answer| answer.within(values))
            }
            RuleCondition::NoneOf { field, values } => {
                with_answer(field, record, |answer| !answer.contains_any(values))
            }
            RuleCondition::ContainsText { field, text } => with_answer(field, record, |answer| {
                answer.contains_text(text)
                    || record
                        .note(field.as_str())
                        .map(|note| note.contains(text.as_str()))
                        .unwrap_or(false)
            }),
            RuleCondition::Exists { field } => Truth::from_bool(field.locate(record).is_some()),
            RuleCondition::Missing { field } => Truth::from_bool(field.locate(record).is_none()),
            RuleCondition::NonEmpty { field } => Truth::from_bool(
                field
                    .locate(record)
                    .map(|answer| !answer.is_empty())
                    .unwrap_or(false),
            ),
            RuleCondition::Empty { field } => Truth::from_bool(
                field
                    .locate(record)
                    .map(Answer::is_empty)
                    .unwrap_or(true),
            ),
        }
    }
}

fn with_answer(
    field: &FieldPath,
    record: &AnnotationRecord,
    check: impl FnOnce(&Answer) -> bool,
) -> Truth {
    match field.locate(record) {
        Some(answer) => Truth::from_bool(check(answer)),
        None => Truth::Absent(field.clone()),
    }
}
