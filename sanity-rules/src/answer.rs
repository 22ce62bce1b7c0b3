use serde::Serialize;
use serde_json::Value;

/// Labels the editor prefixes to free text, e.g. `"Other: custom simulator"`.
const LABELLED_OPTIONS: &[&str] = &["Other", "Discussion needed"];

/// A single answer in an annotation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// Yes/no answer stored as a JSON boolean.
    Flag(bool),
    /// Single selected option or free text.
    Single(String),
    /// Multi-select answer. The editor exports every answer in this form.
    Multiple(Vec<String>),
}

impl Answer {
    /// Selections as a list of options. A flag has no textual selections.
    pub fn selections(&self) -> Vec<&str> {
        match self {
            Answer::Flag(_) => Vec::new(),
            Answer::Single(value) => vec![value.as_str()],
            Answer::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Number of selections, counting a flag as one.
    fn selection_count(&self) -> usize {
        match self {
            Answer::Flag(_) => 1,
            Answer::Single(_) => 1,
            Answer::Multiple(values) => values.len(),
        }
    }

    /// Whether the answer carries no non-blank selection.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Flag(_) => false,
            Answer::Single(value) => value.trim().is_empty(),
            Answer::Multiple(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }

    /// Exactly one selection, matching `expected`.
    pub fn equals(&self, expected: &Value) -> bool {
        match self {
            Answer::Flag(flag) => flag_matches(*flag, expected),
            _ => {
                self.selection_count() == 1
                    && self
                        .selections()
                        .first()
                        .map(|selection| option_matches(selection, expected))
                        .unwrap_or(false)
            }
        }
    }

    /// At least one selection matches `expected`.
    pub fn contains(&self, expected: &Value) -> bool {
        match self {
            Answer::Flag(flag) => flag_matches(*flag, expected),
            _ => self
                .selections()
                .iter()
                .any(|selection| option_matches(selection, expected)),
        }
    }

    /// At least one selection matches one of `candidates`.
    pub fn contains_any(&self, candidates: &[Value]) -> bool {
        candidates.iter().any(|candidate| self.contains(candidate))
    }

    /// Every selection matches one of `candidates`, and there is at least one.
    pub fn within(&self, candidates: &[Value]) -> bool {
        match self {
            Answer::Flag(flag) => candidates.iter().any(|c| flag_matches(*flag, c)),
            _ => {
                let selections = self.selections();
                !selections.is_empty()
                    && selections.iter().all(|selection| {
                        candidates
                            .iter()
                            .any(|candidate| option_matches(selection, candidate))
                    })
            }
        }
    }

    /// Some selection contains `text` as a substring.
    pub fn contains_text(&self, text: &str) -> bool {
        self.selections()
            .iter()
            .any(|selection| selection.contains(text))
    }

    /// Human readable rendering used in violation messages.
    pub fn render(&self) -> String {
        match self {
            Answer::Flag(flag) => flag.to_string(),
            Answer::Single(value) => value.clone(),
            Answer::Multiple(values) => values.join(", "),
        }
    }
}

/// Option label of a selection: `"Other: foo"` yields `"Other"`.
pub fn option_label(selection: &str) -> &str {
    let trimmed = selection.trim();
    for label in LABELLED_OPTIONS {
        if let Some(rest) = trimmed.strip_prefix(label) {
            if rest.starts_with(':') {
                return *label;
            }
        }
    }
    trimmed
}

fn option_matches(selection: &str, expected: &Value) -> bool {
    match expected {
        Value::String(expected) => {
            let expected = expected.trim();
            selection.trim() == expected || option_label(selection) == expected
        }
        Value::Bool(flag) => parse_flag(selection) == Some(*flag),
        Value::Number(number) => match (selection.trim().parse::<f64>(), number.as_f64()) {
            (Ok(lhs), Some(rhs)) => (lhs - rhs).abs() < f64::EPSILON,
            _ => false,
        },
        _ => false,
    }
}

fn flag_matches(flag: bool, expected: &Value) -> bool {
    match expected {
        Value::Bool(expected) => flag == *expected,
        Value::String(expected) => parse_flag(expected) == Some(flag),
        _ => false,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labelled_free_text_matches_its_option() {
        let answer = Answer::Multiple(vec!["Other: in-house simulator".into()]);
        assert!(answer.equals(&json!("Other")));
        assert!(answer.contains_text("in-house"));
        assert_eq!(option_label("Discussion needed: unclear"), "Discussion needed");
        assert_eq!(option_label("Otherwise"), "Otherwise");
    }

    #[test]
    fn flags_match_yes_no_options() {
        assert!(Answer::Flag(false).equals(&json!(false)));
        assert!(Answer::Flag(false).equals(&json!("No")));
        assert!(Answer::Multiple(vec!["Yes".into()]).equals(&json!(true)));
        assert!(!Answer::Single("Maybe".into()).equals(&json!(true)));
    }

    #[test]
    fn equals_requires_a_single_selection() {
        let answer = Answer::Multiple(vec!["Real robot".into(), "Robot simulation".into()]);
        assert!(!answer.equals(&json!("Real robot")));
        assert!(answer.contains(&json!("Real robot")));
        assert!(answer.within(&[json!("Real robot"), json!("Robot simulation")]));
        assert!(!answer.within(&[json!("Real robot")]));
    }

    #[test]
    fn blank_selections_are_empty() {
        assert!(Answer::Single("  ".into()).is_empty());
        assert!(Answer::Multiple(vec![]).is_empty());
        assert!(Answer::Multiple(vec!["".into()]).is_empty());
        assert!(!Answer::Flag(false).is_empty());
        assert!(!Answer::Multiple(vec!["Online".into()]).is_empty());
    }
}
