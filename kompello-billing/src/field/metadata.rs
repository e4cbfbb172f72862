//! GetFieldMetadata command

use kompello_fields::FieldMetadata;
use serde::Deserialize;
use serde_json::Value;

use crate::context::BillingContext;
use crate::error::BillingError;
use kompello_operations::{async_trait, operation, Execute, ExecutionResult};

/// Host entity kinds and data types clients can offer when defining fields
#[operation(
    verb = "metadata",
    noun = "field",
    description = "List supported host entity kinds and data types"
)]
#[derive(Debug, Default, Deserialize)]
pub struct GetFieldMetadata {}

impl GetFieldMetadata {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for GetFieldMetadata {
    async fn execute(&self, _ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        ExecutionResult::read(serde_json::to_value(FieldMetadata::current()).map_err(Into::into))
    }
}
