//! GetField command

use serde::Deserialize;
use serde_json::Value;

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::FieldId;
use kompello_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a custom field definition by ID
#[operation(
    verb = "get",
    noun = "field",
    description = "Get a custom field definition by ID"
)]
#[derive(Debug, Deserialize)]
pub struct GetField {
    pub id: FieldId,
}

impl GetField {
    pub fn new(id: FieldId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for GetField {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        ExecutionResult::read(ctx.read(|db| {
            let definition = db.registry().get(self.id)?;
            ctx.authorize(db, &db.company(definition.company)?)?;
            Ok(serde_json::to_value(&definition)?)
        }))
    }
}
