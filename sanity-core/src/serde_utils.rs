use crate::errors::{Result, SanityError};

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| SanityError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_output_is_indented() {
        let value = serde_json::json!({"Explainability": ["Pseudo-code"]});
        let json = to_pretty_json(&value).expect("serialize");
        assert!(json.starts_with("{\n  \"Explainability\""));
        let decoded: serde_json::Value = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, value);
    }
}
