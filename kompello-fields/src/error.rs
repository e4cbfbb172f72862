//! Error types for custom field schema handling

use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors raised while interpreting custom field schemas and values
#[derive(Debug, Error, PartialEq)]
pub enum FieldsError {
    /// Value does not match the field's declared data type
    #[error("invalid value for custom field '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Identifier does not name a host entity kind that supports custom fields
    #[error("unknown model type: {identifier}")]
    UnknownModelType { identifier: String },

    #[error("unknown data type: {value}")]
    UnknownDataType { value: String },

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("invalid name: {reason}")]
    InvalidName { reason: &'static str },
}

impl FieldsError {
    /// The input attribute the error is about, for per-field error reporting.
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { .. } => "custom_fields",
            Self::UnknownModelType { .. } => "model_type",
            Self::UnknownDataType { .. } => "data_type",
            Self::InvalidKey { .. } => "key",
            Self::InvalidName { .. } => "name",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = FieldsError::TypeMismatch {
            key: "max_hours".into(),
            expected: "number",
            actual: "string",
        };
        let msg = err.to_string();
        assert!(msg.contains("max_hours"));
        assert!(msg.contains("expected number"));
        assert!(msg.contains("got string"));
        assert_eq!(err.field(), "custom_fields");
    }

    #[test]
    fn test_unknown_model_type_display() {
        let err = FieldsError::UnknownModelType {
            identifier: "invoice".into(),
        };
        assert_eq!(err.to_string(), "unknown model type: invoice");
        assert_eq!(err.field(), "model_type");
    }
}
