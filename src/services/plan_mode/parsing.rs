//! Model Output Parsing
//!
//! LLM responses are untrusted free text. These helpers locate the JSON
//! payload without assuming anything about the surrounding prose.

use serde_json::Value;
use thiserror::Error;

/// Why a model response did not yield a JSON object.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no JSON object found")]
    NoObject,

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected a JSON object")]
    NotObject,
}

/// Return the first balanced `{...}` object in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count towards nesting. Returns `None` when no object opens, or when the
/// first object never closes (truncated output).
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract and decode the first JSON object in `text`.
pub fn parse_json_object(text: &str) -> Result<Value, ParseError> {
    let raw = extract_json_object(text).ok_or(ParseError::NoObject)?;
    let value: Value = serde_json::from_str(raw)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ParseError::NotObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_wrapper_text() {
        let text = "Sure! Here is the plan:\n```json\n{\"overview\": \"X\", \"steps\": []}\n```\nLet me know.";
        assert_eq!(
            extract_json_object(text),
            Some("{\"overview\": \"X\", \"steps\": []}")
        );
    }

    #[test]
    fn test_extract_nested_and_first_only() {
        let text = r#"{"a": {"b": 1}} and then {"c": 2}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"result: {"code": "fn main() { let s = \"}\"; }", "ok": true} trailing"#;
        let extracted = extract_json_object(text).unwrap();
        let value: serde_json::Value = serde_json::from_str(extracted).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_truncated_and_missing() {
        assert_eq!(extract_json_object(r#"{"isComplete": true, "missing"#), None);
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_parse_json_object_errors() {
        assert!(matches!(
            parse_json_object("{not json}"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(
            parse_json_object("plain"),
            Err(ParseError::NoObject)
        ));
        assert!(parse_json_object("{not json}")
            .unwrap_err()
            .to_string()
            .starts_with("malformed JSON"));
        assert_eq!(parse_json_object(r#"x {"a": 1} y"#).unwrap()["a"], 1);
    }
}
