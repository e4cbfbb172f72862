//! DeleteField command

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::FieldId;
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Delete a custom field definition that no value uses
#[operation(
    verb = "delete",
    noun = "field",
    description = "Delete an unused custom field definition"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteField {
    pub id: FieldId,
}

impl DeleteField {
    pub fn new(id: FieldId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for DeleteField {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let registry = db.registry();
            let definition = registry.get(self.id)?;
            ctx.authorize(db, &db.company(definition.company)?)?;
            let deleted = registry.delete(self.id)?;
            Ok(json!({ "deleted": true, "id": deleted.id, "key": deleted.key }))
        });

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
