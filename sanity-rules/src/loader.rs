use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::RuleError;
use crate::rule::Rule;

/// Loads rules from a file or a directory, keeping configuration order.
///
/// Directory entries are read in file name order.
pub fn load_rules(path: impl AsRef<Path>) -> Result<Vec<Rule>, RuleError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RuleError::MissingPath(path.display().to_string()));
    }

    let mut rules = if path.is_dir() {
        load_from_directory(path)?
    } else {
        load_from_file(path)?
    };

    assign_ids(&mut rules);
    deduplicate(&rules, path)?;

    debug!(path = %path.display(), rules = rules.len(), "loaded rule configuration");
    Ok(rules)
}

/// Parses a rule document held in memory. `format` is `json` or `yaml`.
pub fn parse_rules_str(raw: &str, source: &Path, format: &str) -> Result<Vec<Rule>, RuleError> {
    let mut rules = parse_rules(raw, source, format)?;
    assign_ids(&mut rules);
    deduplicate(&rules, source)?;
    Ok(rules)
}

fn load_from_directory(path: &Path) -> Result<Vec<Rule>, RuleError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path).map_err(|err| RuleError::from_io(path, err))? {
        let entry = entry.map_err(|err| RuleError::from_io(path, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| RuleError::from_io(entry.path(), err))?;
        if file_type.is_dir() {
            continue;
        }

        if rule_format(&entry.path()).is_some() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut rules = Vec::new();
    for file in files {
        let mut file_rules = load_from_file(&file)?;
        rules.append(&mut file_rules);
    }

    Ok(rules)
}

fn load_from_file(path: &Path) -> Result<Vec<Rule>, RuleError> {
    let raw = fs::read_to_string(path).map_err(|err| RuleError::from_io(path, err))?;
    let format = rule_format(path).unwrap_or("json");
    parse_rules(&raw, path, format)
}

fn rule_format(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|value| value.to_str()) {
        Some("json") => Some("json"),
        Some("yaml") | Some("yml") => Some("yaml"),
        _ => None,
    }
}

fn parse_rules(raw: &str, path: &Path, format: &str) -> Result<Vec<Rule>, RuleError> {
    let parsed = if format == "yaml" {
        parse_yaml(raw).map_err(|err| err.to_string())
    } else {
        parse_json(raw).map_err(|err| err.to_string())
    };

    parsed.map_err(|message| RuleError::parse_error(path.to_path_buf(), message))
}

fn parse_json(raw: &str) -> Result<Vec<Rule>, serde_json::Error> {
    let is_document = serde_json::from_str::<serde_json::Value>(raw)
        .map(|value| value.get("rules").is_some())
        .unwrap_or(false);
    if is_document {
        serde_json::from_str::<RuleDocument>(raw).map(|doc| doc.rules)
    } else {
        serde_json::from_str::<RuleForms>(raw).map(RuleForms::into_rules)
    }
}

fn parse_yaml(raw: &str) -> Result<Vec<Rule>, serde_yaml::Error> {
    let is_document = serde_yaml::from_str::<serde_yaml::Value>(raw)
        .map(|value| value.get("rules").is_some())
        .unwrap_or(false);
    if is_document {
        serde_yaml::from_str::<RuleDocument>(raw).map(|doc| doc.rules)
    } else {
        serde_yaml::from_str::<RuleForms>(raw).map(RuleForms::into_rules)
    }
}

fn assign_ids(rules: &mut [Rule]) {
    for (index, rule) in rules.iter_mut().enumerate() {
        if rule.id.trim().is_empty() {
            rule.id = format!("rule-{}", index + 1);
        }
    }
}

fn deduplicate(rules: &[Rule], path: &Path) -> Result<(), RuleError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id.as_str()) {
            return Err(RuleError::DuplicateRule {
                path: path.display().to_string(),
                id: rule.id.clone(),
            });
        }
    }
    Ok(())
}

/// `{"rules": [...]}`. Parsed on its own so errors point at the broken rule.
#[derive(Debug, Deserialize)]
struct RuleDocument {
    rules: Vec<Rule>,
}

/// The other accepted top-level shapes: a list of rules, or one rule.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleForms {
    List(Vec<Rule>),
    Single(Box<Rule>),
}

impl RuleForms {
    fn into_rules(self) -> Vec<Rule> {
        match self {
            RuleForms::List(list) => list,
            RuleForms::Single(rule) => vec![*rule],
        }
    }
}
