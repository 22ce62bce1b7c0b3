use std::path::Path;

use crate::error::RuleError;
use crate::loader::parse_rules_str;
use crate::rule::Rule;

const DEFAULT_RULES_YAML: &str = include_str!("../rules/default.yaml");
const DEFAULT_RULES_SOURCE: &str = "<built-in rules>";

/// The built-in sanity checks, in report order.
pub fn default_rules() -> Result<Vec<Rule>, RuleError> {
    parse_rules_str(DEFAULT_RULES_YAML, Path::new(DEFAULT_RULES_SOURCE), "yaml")
}
