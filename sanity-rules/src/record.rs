use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::answer::Answer;
use crate::error::RecordError;

/// Flat mapping from attribute name to answer for one paper.
///
/// Lookups ignore case and surrounding whitespace in attribute names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotationRecord {
    #[serde(flatten)]
    answers: BTreeMap<String, Answer>,
    #[serde(skip)]
    index: BTreeMap<String, String>,
    /// Free text the editor attaches to an answered attribute, keyed by
    /// normalized attribute name.
    #[serde(skip)]
    notes: BTreeMap<String, String>,
}

impl AnnotationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat `{attribute: answer}` object.
    pub fn from_value(value: &Value, source_name: &str) -> Result<Self, RecordError> {
        let map = expect_object(value, source_name)?;
        let mut record = Self::new();
        for (attribute, raw) in map {
            if let Some(answer) = parse_answer(raw, attribute, source_name)? {
                record.insert_checked(attribute, answer, source_name)?;
            }
        }
        Ok(record)
    }

    /// Inserts an answer, replacing any answer stored under the same name.
    pub fn insert(&mut self, attribute: impl Into<String>, answer: Answer) {
        let attribute = attribute.into();
        let key = normalize(&attribute);
        if let Some(previous) = self.index.insert(key, attribute.clone()) {
            self.answers.remove(&previous);
        }
        self.answers.insert(attribute, answer);
    }

    fn insert_checked(
        &mut self,
        attribute: &str,
        answer: Answer,
        source_name: &str,
    ) -> Result<(), RecordError> {
        if self.index.contains_key(&normalize(attribute)) {
            return Err(RecordError::DuplicateAttribute {
                source_name: source_name.to_string(),
                attribute: attribute.to_string(),
            });
        }
        self.insert(attribute, answer);
        Ok(())
    }

    /// Attaches free text to `attribute`.
    ///
    /// The text becomes the answer when the attribute has none; otherwise it
    /// is kept as a note beside the existing selections.
    fn attach_text(
        &mut self,
        attribute: &str,
        text: String,
        source_name: &str,
    ) -> Result<(), RecordError> {
        if !self.contains(attribute) {
            return self.insert_checked(attribute, Answer::Single(text), source_name);
        }
        if self.notes.insert(normalize(attribute), text).is_some() {
            return Err(RecordError::DuplicateAttribute {
                source_name: source_name.to_string(),
                attribute: attribute.to_string(),
            });
        }
        Ok(())
    }

    /// Free text attached to an answered attribute.
    pub fn note(&self, attribute: &str) -> Option<&str> {
        self.notes.get(&normalize(attribute)).map(String::as_str)
    }

    pub fn get(&self, attribute: &str) -> Option<&Answer> {
        self.index
            .get(&normalize(attribute))
            .and_then(|name| self.answers.get(name))
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }
}

/// Bibliographic data the editor stores alongside each paper.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaperInfo {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
}

/// One paper as written by the annotation editor's export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperEntry {
    pub key: String,
    pub paper: PaperInfo,
    /// Excluded papers are not sanity checked.
    pub excluded: bool,
    pub exclusion_reason: Option<String>,
    pub record: AnnotationRecord,
}

impl PaperEntry {
    /// Parses an entry with a `responses` object, flattening the question level.
    pub fn from_value(key: &str, value: &Value, source_name: &str) -> Result<Self, RecordError> {
        let map = expect_object(value, source_name)?;
        let mut record = AnnotationRecord::new();

        if let Some(responses) = map.get("responses") {
            for (attribute, raw) in question_attributes(responses, "responses", source_name)? {
                if let Some(answer) = parse_answer(raw, attribute, source_name)? {
                    record.insert_checked(attribute, answer, source_name)?;
                }
            }
        }
        // Mandatory texts reuse the question/attribute keys of `responses`.
        if let Some(texts) = map.get("mandatory_texts") {
            for (attribute, raw) in question_attributes(texts, "mandatory_texts", source_name)? {
                let Some(text) = raw.as_str().map(str::trim).filter(|text| !text.is_empty())
                else {
                    continue;
                };
                record.attach_text(attribute, text.to_string(), source_name)?;
            }
        }

        let paper = map
            .get("paper")
            .and_then(Value::as_object)
            .map(|info| PaperInfo {
                title: text_field(info, "title"),
                authors: text_field(info, "authors"),
                year: text_field(info, "year"),
            })
            .unwrap_or_default();

        let excluded = map
            .get("excluded_from_full_text_review")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(Self {
            key: key.to_string(),
            paper,
            excluded,
            exclusion_reason: text_field(map, "exclusion_reason"),
            record,
        })
    }
}

/// Parsed record input: a single record or the editor's whole export.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDocument {
    Record(AnnotationRecord),
    Papers(Vec<PaperEntry>),
}

impl RecordDocument {
    /// Reads and parses a record document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| RecordError::Io {
            path: source_name.clone(),
            source,
        })?;
        Self::from_json_str(&raw, &source_name)
    }

    pub fn from_json_str(raw: &str, source_name: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(raw).map_err(|err| RecordError::InvalidJson {
            source_name: source_name.to_string(),
            message: err.to_string(),
        })?;
        Self::from_value(&value, source_name)
    }

    /// Detects the document shape.
    ///
    /// An object with a `responses` object is a single paper entry; an
    /// object whose values are all paper entries is an export bundle;
    /// anything else is a flat record.
    pub fn from_value(value: &Value, source_name: &str) -> Result<Self, RecordError> {
        let map = expect_object(value, source_name)?;

        if is_paper_entry(value) {
            let key = source_name.to_string();
            let entry = PaperEntry::from_value(&key, value, source_name)?;
            return Ok(RecordDocument::Papers(vec![entry]));
        }

        if !map.is_empty() && map.values().all(is_paper_entry) {
            let papers = map
                .iter()
                .map(|(key, entry)| PaperEntry::from_value(key, entry, source_name))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(RecordDocument::Papers(papers));
        }

        AnnotationRecord::from_value(value, source_name).map(RecordDocument::Record)
    }

    /// Keeps only the paper with the given key.
    pub fn select_paper(self, key: &str, source_name: &str) -> Result<Self, RecordError> {
        let unknown = || RecordError::UnknownPaper {
            source_name: source_name.to_string(),
            key: key.to_string(),
        };
        match self {
            RecordDocument::Papers(papers) => papers
                .into_iter()
                .find(|paper| paper.key == key)
                .map(|paper| RecordDocument::Papers(vec![paper]))
                .ok_or_else(unknown),
            RecordDocument::Record(_) => Err(unknown()),
        }
    }
}

fn is_paper_entry(value: &Value) -> bool {
    value
        .get("responses")
        .map(Value::is_object)
        .unwrap_or(false)
}

/// Flattens a `{question: {attribute: value}}` section into attribute pairs.
fn question_attributes<'a>(
    value: &'a Value,
    section: &str,
    source_name: &str,
) -> Result<Vec<(&'a str, &'a Value)>, RecordError> {
    let questions = value.as_object().ok_or_else(|| RecordError::UnexpectedShape {
        source_name: source_name.to_string(),
        attribute: section.to_string(),
        found: json_kind(value).to_string(),
    })?;

    let mut pairs = Vec::new();
    for (question, attributes) in questions {
        let attributes = attributes
            .as_object()
            .ok_or_else(|| RecordError::UnexpectedShape {
                source_name: source_name.to_string(),
                attribute: format!("{section}.{question}"),
                found: json_kind(attributes).to_string(),
            })?;
        pairs.extend(
            attributes
                .iter()
                .map(|(attribute, raw)| (attribute.as_str(), raw)),
        );
    }
    Ok(pairs)
}

fn parse_answer(
    value: &Value,
    attribute: &str,
    source_name: &str,
) -> Result<Option<Answer>, RecordError> {
    let unexpected = |found: String| RecordError::UnexpectedShape {
        source_name: source_name.to_string(),
        attribute: attribute.to_string(),
        found,
    };

    match value {
        Value::Null => Ok(None),
        Value::Bool(flag) => Ok(Some(Answer::Flag(*flag))),
        Value::String(text) => Ok(Some(Answer::Single(text.clone()))),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| unexpected(format!("array containing {}", json_kind(item))))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|values| Some(Answer::Multiple(values))),
        other => Err(unexpected(json_kind(other).to_string())),
    }
}

fn expect_object<'a>(
    value: &'a Value,
    source_name: &str,
) -> Result<&'a Map<String, Value>, RecordError> {
    value.as_object().ok_or_else(|| RecordError::NotAnObject {
        source_name: source_name.to_string(),
        found: json_kind(value),
    })
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn normalize(attribute: &str) -> String {
    attribute.trim().to_lowercase()
}
