//! Error types for the billing engine

use kompello_fields::FieldsError;
use thiserror::Error;

/// Result type for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;

/// Coarse classification of a [`BillingError`], for mapping onto a transport
/// status (4xx family for everything except `Internal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Forbidden,
    Internal,
}

/// Errors that can occur in billing operations
#[derive(Debug, Error)]
pub enum BillingError {
    /// Malformed or unacceptable input
    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    /// The request collides with existing state
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Write attempted against an archived custom field
    #[error("cannot set value for archived field '{key}'")]
    ArchivedField { key: String },

    /// Generic resource not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The actor may not touch this tenant's data
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("database error: {0}")]
    Database(#[from] Box<rusqlite::Error>),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Storage handle unusable (poisoned lock, corrupt row)
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl BillingError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::ArchivedField { .. } => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Database(_) | Self::Json(_) | Self::Config(_) | Self::Storage { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Every failure here is a caller input problem; nothing is retried.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl From<FieldsError> for BillingError {
    fn from(err: FieldsError) -> Self {
        Self::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for BillingError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(Box::new(err))
    }
}

impl From<figment::Error> for BillingError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Whether a SQLite error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BillingError::not_found("field", "abc123");
        assert_eq!(err.to_string(), "field not found: abc123");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_archived_field_is_a_validation_error() {
        let err = BillingError::ArchivedField {
            key: "legacy_code".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("legacy_code"));
    }

    #[test]
    fn test_fields_error_converts_to_validation() {
        let err: BillingError = FieldsError::UnknownModelType {
            identifier: "invoice".into(),
        }
        .into();
        match err {
            BillingError::Validation { field, message } => {
                assert_eq!(field, "model_type");
                assert!(message.contains("invoice"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_retryable() {
        assert!(!BillingError::conflict("duplicate").is_retryable());
        assert!(!BillingError::storage("lock poisoned").is_retryable());
    }

    #[test]
    fn test_unique_violation_detection() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        assert!(is_unique_violation(&err));
        let err = conn
            .execute("INSERT INTO missing VALUES (1)", [])
            .unwrap_err();
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_sqlite_error_converts_to_internal() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: BillingError = conn
            .execute("INSERT INTO missing VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, BillingError::Database(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().starts_with("database error: "));
        assert!(err.to_string().contains("missing"));
    }
}
