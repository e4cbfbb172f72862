//! Execution result types for operations

use std::fmt::Display;
use std::time::Instant;

use serde_json::Value;

use crate::LogEntry;

/// Result of executing an operation
///
/// - `Logged`: the operation changed state and gets an activity entry
/// - `Unlogged`: read-only, nothing to record
/// - `Failed`: the operation was rejected; mutations still record the attempt
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Whether a log entry is attached
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}

impl<E> ExecutionResult<Value, E> {
    /// Wrap the outcome of a read-only operation.
    pub fn read(result: Result<Value, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

impl<E: Display> ExecutionResult<Value, E> {
    /// Wrap the outcome of a mutating operation, recording a log entry for
    /// both success and failure. `started` is when the operation began.
    pub fn mutation(
        op: impl Into<String>,
        input: Value,
        started: Instant,
        result: Result<Value, E>,
    ) -> Self {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => Self::Logged {
                log_entry: LogEntry::new(op, input, value.clone(), None, duration_ms),
                value,
            },
            Err(error) => {
                let output = serde_json::json!({ "error": error.to_string() });
                Self::Failed {
                    log_entry: Some(LogEntry::new(op, input, output, None, duration_ms)),
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutation_success_is_logged() {
        let result: ExecutionResult<Value, String> = ExecutionResult::mutation(
            "add field",
            json!({"key": "k"}),
            Instant::now(),
            Ok(json!(1)),
        );
        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value.unwrap(), json!(1));
        let entry = entry.unwrap();
        assert_eq!(entry.op, "add field");
        assert_eq!(entry.output, json!(1));
    }

    #[test]
    fn mutation_failure_records_error() {
        let result: ExecutionResult<Value, String> = ExecutionResult::mutation(
            "delete field",
            json!({}),
            Instant::now(),
            Err("would result in data loss".to_string()),
        );
        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value.unwrap_err(), "would result in data loss");
        assert_eq!(entry.unwrap().output["error"], "would result in data loss");
    }

    #[test]
    fn read_is_unlogged() {
        let result: ExecutionResult<Value, String> = ExecutionResult::read(Ok(json!([])));
        assert!(!result.should_log());
        assert_eq!(result.into_result().unwrap(), json!([]));

        let failed: ExecutionResult<Value, String> = ExecutionResult::read(Err("nope".into()));
        assert!(!failed.should_log());
        assert!(failed.into_result().is_err());
    }
}
