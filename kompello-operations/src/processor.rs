//! Processor trait: runs operations and routes their log entries

use async_trait::async_trait;
use serde_json::Value;

use crate::{Execute, LogEntry};

/// Executes operations against a context and records what they did.
///
/// Implementations decide where log entries go (files, tracing, nowhere).
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn process<T>(&self, operation: &T, ctx: &C) -> Result<Value, E>
    where
        T: Execute<C, E> + Send + Sync;

    async fn write_log(
        &self,
        ctx: &C,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<(), E>;
}
