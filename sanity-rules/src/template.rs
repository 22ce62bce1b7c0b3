use crate::record::AnnotationRecord;

/// Placeholder text for attributes the record does not answer.
pub const MISSING_VALUE: &str = "<missing>";

/// Substitutes `{Attribute}` placeholders with the record's answers.
///
/// `{{` and `}}` render literal braces. An unterminated `{` is kept as is.
pub fn render_message(template: &str, record: &AnnotationRecord) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(position) = rest.find(['{', '}']) {
        output.push_str(&rest[..position]);
        let tail = &rest[position..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            output.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('}') {
            output.push('}');
            rest = &tail[1..];
            continue;
        }

        match tail[1..].find('}') {
            Some(end) => {
                let attribute = &tail[1..end + 1];
                match record.get(attribute) {
                    Some(answer) => output.push_str(&answer.render()),
                    None => output.push_str(MISSING_VALUE),
                }
                rest = &tail[end + 2..];
            }
            None => {
                output.push_str(tail);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> AnnotationRecord {
        AnnotationRecord::from_value(
            &json!({
                "Explainability": ["Full"],
                "Deployment type": ["Real robot", "Robot simulation"]
            }),
            "test",
        )
        .expect("record")
    }

    #[test]
    fn substitutes_answers() {
        let message = render_message(
            "Explainability is '{Explainability}' for {Deployment type}",
            &record(),
        );
        assert_eq!(
            message,
            "Explainability is 'Full' for Real robot, Robot simulation"
        );
    }

    #[test]
    fn marks_missing_attributes() {
        assert_eq!(
            render_message("Location: {Location}", &record()),
            "Location: <missing>"
        );
    }

    #[test]
    fn keeps_escaped_and_unterminated_braces() {
        assert_eq!(
            render_message("{{literal}} and {open", &record()),
            "{literal} and {open"
        );
        assert_eq!(render_message("plain text", &record()), "plain text");
    }
}
