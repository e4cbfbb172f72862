//! AddField command

use std::time::Instant;

use kompello_fields::{resolve_entity_type, FieldDataType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::{CompanyId, NewFieldDefinition};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

fn default_true() -> bool {
    true
}

/// Define a custom field for one host kind within a company
#[operation(
    verb = "add",
    noun = "field",
    description = "Define a custom field for a company and host entity kind"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddField {
    pub company: CompanyId,
    /// Host entity kind slug, e.g. "item"
    pub model_type: String,
    /// Machine name, unique per company and host kind
    pub key: String,
    /// Display name
    pub name: String,
    pub data_type: FieldDataType,
    #[serde(default = "default_true")]
    pub track_history: bool,
    #[serde(default = "default_true")]
    pub show_in_ui: bool,
    /// Free-form hints for clients (validation rules, options, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Value>,
}

impl AddField {
    pub fn new(
        company: CompanyId,
        model_type: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        data_type: FieldDataType,
    ) -> Self {
        Self {
            company,
            model_type: model_type.into(),
            key: key.into(),
            name: name.into(),
            data_type,
            track_history: true,
            show_in_ui: true,
            extra_data: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.show_in_ui = false;
        self
    }

    pub fn with_extra_data(mut self, extra_data: Value) -> Self {
        self.extra_data = Some(extra_data);
        self
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for AddField {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let model_type = resolve_entity_type(&self.model_type)?;
            let Some(company) = db.find_company(self.company)? else {
                return Err(BillingError::validation(
                    "company",
                    format!("company {} does not exist", self.company),
                ));
            };
            ctx.authorize(db, &company)?;

            let definition = db.registry().create(NewFieldDefinition {
                key: self.key.clone(),
                name: self.name.clone(),
                data_type: self.data_type,
                model_type,
                company: company.id,
                track_history: self.track_history,
                show_in_ui: self.show_in_ui,
                extra_data: self.extra_data.clone(),
            })?;
            Ok(serde_json::to_value(&definition)?)
        });

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result["id"]
            .as_str()
            .map(str::to_string)
            .into_iter()
            .collect()
    }
}
