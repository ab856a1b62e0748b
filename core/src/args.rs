use std::num::IntErrorKind;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::codes;

/// Key under which tool-calling clients nest the call arguments.
pub const ARGUMENTS_KEY: &str = "arguments";

#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("Request body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Request body must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
    #[error("'{field}' must be a {expected}, got {found}")]
    InvalidArgument {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ArgumentError {
    pub fn code(&self) -> &'static str {
        match self {
            ArgumentError::Parse(_) | ArgumentError::NotAnObject { .. } => codes::PARSE_ERROR,
            ArgumentError::InvalidArgument { .. } => codes::VALIDATION_FAILED,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ArgumentError::InvalidArgument { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

/// Parse a raw trigger body and resolve it to the flat argument mapping.
///
/// Accepts both `{"arguments": {...}}` (tool-calling clients) and a flat
/// `{...}` object (direct test calls).
pub fn normalize(raw: &str) -> Result<Map<String, Value>, ArgumentError> {
    let parsed: Value = serde_json::from_str(raw)?;
    normalize_value(parsed)
}

/// Same as [`normalize`] for a body that is already parsed.
pub fn normalize_value(value: Value) -> Result<Map<String, Value>, ArgumentError> {
    let mut content = match value {
        Value::Object(map) => map,
        other => {
            return Err(ArgumentError::NotAnObject {
                found: json_type_name(&other),
            });
        }
    };

    if matches!(content.get(ARGUMENTS_KEY), Some(Value::Object(_))) {
        if let Some(Value::Object(nested)) = content.remove(ARGUMENTS_KEY) {
            return Ok(nested);
        }
    }
    Ok(content)
}

/// Read a string argument. Missing or `null` reads as the empty string.
pub fn arg_str<'a>(args: &'a Map<String, Value>, key: &str) -> Result<&'a str, ArgumentError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(v)) => Ok(v.as_str()),
        Some(other) => Err(ArgumentError::InvalidArgument {
            field: key.to_string(),
            expected: "string",
            found: json_type_name(other),
        }),
    }
}

/// Read an integer-ish argument, substituting `default` for anything that
/// does not coerce. Never fails.
///
/// Out-of-range integers saturate instead of falling back, and booleans
/// read as 0 or 1.
pub fn arg_limit(args: &Map<String, Value>, key: &str, default: i64) -> i64 {
    match args.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(v) => v,
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => default,
            },
        },
        Some(Value::Bool(flag)) => i64::from(*flag),
        _ => default,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_and_flat_shapes_normalize_to_the_same_mapping() {
        let nested = normalize(r#"{"arguments": {"query": "usb", "max_results": "4"}}"#).unwrap();
        let flat = normalize(r#"{"query": "usb", "max_results": "4"}"#).unwrap();
        assert_eq!(nested, flat);
        assert_eq!(nested.get("query"), Some(&json!("usb")));
    }

    #[test]
    fn empty_object_normalizes_to_empty_mapping() {
        assert!(normalize("{}").unwrap().is_empty());
        assert!(normalize(r#"{"arguments": {}}"#).unwrap().is_empty());
    }

    #[test]
    fn non_object_arguments_value_falls_back_to_top_level() {
        let args = normalize(r#"{"arguments": "oops", "city": "Paris"}"#).unwrap();
        assert_eq!(args.get("city"), Some(&json!("Paris")));
        assert_eq!(args.get("arguments"), Some(&json!("oops")));

        let args = normalize(r#"{"arguments": null}"#).unwrap();
        assert_eq!(args.get("arguments"), Some(&Value::Null));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = normalize("{not json").expect_err("malformed body must fail");
        assert!(matches!(err, ArgumentError::Parse(_)));
        assert_eq!(err.code(), codes::PARSE_ERROR);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = normalize("[1, 2]").expect_err("array body must fail");
        assert!(matches!(err, ArgumentError::NotAnObject { found: "array" }));
        assert_eq!(err.code(), codes::PARSE_ERROR);
    }

    #[test]
    fn arg_str_defaults_to_empty_and_rejects_non_strings() {
        let args = normalize(r#"{"city": "Tokyo", "gone": null, "n": 3}"#).unwrap();
        assert_eq!(arg_str(&args, "city").unwrap(), "Tokyo");
        assert_eq!(arg_str(&args, "gone").unwrap(), "");
        assert_eq!(arg_str(&args, "missing").unwrap(), "");

        let err = arg_str(&args, "n").expect_err("number is not a string");
        assert_eq!(err.code(), codes::VALIDATION_FAILED);
        assert_eq!(err.field(), Some("n"));
    }

    #[test]
    fn arg_limit_coerces_or_falls_back_to_default() {
        let args = json!({
            "int": 4,
            "str": " 2 ",
            "float": 4.9,
            "word": "lots",
            "float_str": "2.5",
            "flag": true,
            "off": false,
            "huge": "99999999999999999999",
            "tiny": "-99999999999999999999",
            "huge_number": 1e20,
            "nothing": null
        });
        let args = args.as_object().unwrap();
        assert_eq!(arg_limit(args, "int", 3), 4);
        assert_eq!(arg_limit(args, "str", 3), 2);
        assert_eq!(arg_limit(args, "float", 3), 4);
        assert_eq!(arg_limit(args, "word", 3), 3);
        assert_eq!(arg_limit(args, "float_str", 3), 3);
        assert_eq!(arg_limit(args, "flag", 3), 1);
        assert_eq!(arg_limit(args, "off", 3), 0);
        assert_eq!(arg_limit(args, "huge", 3), i64::MAX);
        assert_eq!(arg_limit(args, "tiny", 3), i64::MIN);
        assert_eq!(arg_limit(args, "huge_number", 3), i64::MAX);
        assert_eq!(arg_limit(args, "nothing", 3), 3);
        assert_eq!(arg_limit(args, "absent", 3), 3);
    }
}
