//! Billing operation processor
//!
//! Runs an operation against a [`BillingContext`], attributes its log entry to
//! the context's actor and emits the entry as a `kompello::activity` event.

use serde_json::Value;
use tracing::info;

use crate::context::BillingContext;
use crate::error::BillingError;
use kompello_operations::{async_trait, Execute, LogEntry, OperationProcessor};

#[derive(Debug, Default, Clone, Copy)]
pub struct BillingOperationProcessor;

impl BillingOperationProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OperationProcessor<BillingContext, BillingError> for BillingOperationProcessor {
    async fn process<T>(&self, operation: &T, ctx: &BillingContext) -> Result<Value, BillingError>
    where
        T: Execute<BillingContext, BillingError> + Send + Sync,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(entry) = log_entry {
            let entry = entry.with_actor(ctx.actor().user.to_string());
            let affected = match &result {
                Ok(value) => operation.affected_resource_ids(value),
                Err(_) => Vec::new(),
            };
            self.write_log(ctx, &entry, &affected).await?;
        }

        result
    }

    async fn write_log(
        &self,
        _ctx: &BillingContext,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<(), BillingError> {
        info!(
            target: "kompello::activity",
            id = %log_entry.id,
            op = %log_entry.op,
            actor = log_entry.actor.as_deref().unwrap_or("-"),
            duration_ms = log_entry.duration_ms,
            failed = log_entry.is_failure(),
            affected = ?affected_resources,
            "{}",
            log_entry.op
        );
        Ok(())
    }
}
