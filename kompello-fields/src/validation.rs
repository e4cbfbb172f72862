//! Type validation for custom field values and definition labels.

use serde_json::Value;

use crate::error::{FieldsError, Result};
use crate::types::{FieldDataType, FieldValue};

/// Longest key or display name a field definition may have.
pub const MAX_LABEL_LEN: usize = 256;

/// Check `raw` against `data_type` and convert it to a typed value.
///
/// `null` is valid for every type. Strings are only text, numbers only
/// numbers, booleans only booleans; no coercion between them (`"40"` is not a
/// number and `1` is not a boolean). Arrays and objects never validate.
pub fn validate_value(key: &str, data_type: FieldDataType, raw: &Value) -> Result<FieldValue> {
    match (data_type, raw) {
        (_, Value::Null) => Ok(FieldValue::Null),
        (FieldDataType::Text, Value::String(s)) => Ok(FieldValue::Text(s.clone())),
        (FieldDataType::Number, Value::Number(n)) => Ok(FieldValue::Number(n.clone())),
        (FieldDataType::Boolean, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
        (expected, actual) => Err(FieldsError::TypeMismatch {
            key: key.to_string(),
            expected: expected.as_str(),
            actual: json_kind(actual),
        }),
    }
}

/// Field keys are machine names: non-blank, no whitespace, bounded length.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.trim().is_empty() {
        "must not be blank"
    } else if key.chars().count() > MAX_LABEL_LEN {
        "must be at most 256 characters"
    } else if key.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(FieldsError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FieldsError::InvalidName {
            reason: "must not be blank",
        });
    }
    if name.chars().count() > MAX_LABEL_LEN {
        return Err(FieldsError::InvalidName {
            reason: "must be at most 256 characters",
        });
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
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
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(FieldDataType::Text, json!("Senior"))]
    #[case(FieldDataType::Text, json!(""))]
    #[case(FieldDataType::Number, json!(40))]
    #[case(FieldDataType::Number, json!(-2.5))]
    #[case(FieldDataType::Boolean, json!(true))]
    #[case(FieldDataType::Boolean, json!(false))]
    #[case(FieldDataType::Text, json!(null))]
    #[case(FieldDataType::Number, json!(null))]
    #[case(FieldDataType::Boolean, json!(null))]
    fn accepts_matching_values(#[case] data_type: FieldDataType, #[case] raw: Value) {
        let value = validate_value("k", data_type, &raw).unwrap();
        assert!(value.conforms_to(data_type));
        assert_eq!(Value::from(value), raw);
    }

    #[rstest]
    #[case(FieldDataType::Number, json!("not a number"), "string")]
    #[case(FieldDataType::Number, json!("40"), "string")]
    #[case(FieldDataType::Boolean, json!(1), "number")]
    #[case(FieldDataType::Boolean, json!("true"), "string")]
    #[case(FieldDataType::Text, json!(12), "number")]
    #[case(FieldDataType::Text, json!(["a"]), "array")]
    #[case(FieldDataType::Number, json!({"v": 1}), "object")]
    fn rejects_mismatched_values(
        #[case] data_type: FieldDataType,
        #[case] raw: Value,
        #[case] actual: &'static str,
    ) {
        let err = validate_value("max_hours", data_type, &raw).unwrap_err();
        assert_eq!(
            err,
            FieldsError::TypeMismatch {
                key: "max_hours".into(),
                expected: data_type.as_str(),
                actual,
            }
        );
    }

    #[rstest]
    #[case("skill_level", true)]
    #[case("a", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("skill level", false)]
    fn key_rules(#[case] key: &str, #[case] ok: bool) {
        assert_eq!(validate_key(key).is_ok(), ok);
    }

    #[test]
    fn key_length_is_bounded() {
        assert!(validate_key(&"k".repeat(MAX_LABEL_LEN)).is_ok());
        assert!(validate_key(&"k".repeat(MAX_LABEL_LEN + 1)).is_err());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("Skill Level").is_ok());
        assert!(validate_name(" ").is_err());
        assert!(validate_name(&"n".repeat(MAX_LABEL_LEN + 1)).is_err());
    }
}
