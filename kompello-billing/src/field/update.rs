//! UpdateField command

use std::time::Instant;

use kompello_fields::FieldDataType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::{FieldDefinitionPatch, FieldId};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Update a custom field definition.
///
/// Key, host kind and company are fixed at creation. The data type can only
/// change while no values use the field; everything else, archiving included,
/// may change at any time.
#[operation(
    verb = "update",
    noun = "field",
    description = "Update a custom field definition"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateField {
    pub id: FieldId,
    #[serde(flatten)]
    pub patch: FieldDefinitionPatch,
}

impl UpdateField {
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            patch: FieldDefinitionPatch::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.patch.name = Some(name.into());
        self
    }

    pub fn with_data_type(mut self, data_type: FieldDataType) -> Self {
        self.patch.data_type = Some(data_type);
        self
    }

    pub fn archived(mut self, is_archived: bool) -> Self {
        self.patch.is_archived = Some(is_archived);
        self
    }

    pub fn with_show_in_ui(mut self, show_in_ui: bool) -> Self {
        self.patch.show_in_ui = Some(show_in_ui);
        self
    }

    pub fn with_track_history(mut self, track_history: bool) -> Self {
        self.patch.track_history = Some(track_history);
        self
    }

    pub fn with_extra_data(mut self, extra_data: Value) -> Self {
        self.patch.extra_data = Some(extra_data);
        self
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for UpdateField {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let registry = db.registry();
            let current = registry.get(self.id)?;
            ctx.authorize(db, &db.company(current.company)?)?;
            let definition = registry.update(self.id, self.patch.clone())?;
            Ok(serde_json::to_value(&definition)?)
        });

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
