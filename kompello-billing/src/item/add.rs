//! AddItem command

use std::time::Instant;

use chrono::Utc;
use kompello_fields::validate_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{item_json, validate_prices};
use crate::context::BillingContext;
use crate::custom_fields::{reconcile_custom_fields, CustomFieldInput, WriteMode};
use crate::error::BillingError;
use crate::types::{CompanyId, HostRef, Item, ItemId};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Create a billable item, together with its custom field values
#[operation(verb = "add", noun = "item", description = "Create a billable item")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddItem {
    pub company: CompanyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_per_unit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    /// Custom field values keyed by field key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFieldInput>,
}

impl AddItem {
    pub fn new(company: CompanyId, name: impl Into<String>, price_per_unit: f64) -> Self {
        Self {
            company,
            name: name.into(),
            description: String::new(),
            price_per_unit,
            price_max: None,
            custom_fields: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price_max(mut self, price_max: f64) -> Self {
        self.price_max = Some(price_max);
        self
    }

    pub fn with_custom_fields(mut self, fields: CustomFieldInput) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for AddItem {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let company = db.company(self.company)?;
            ctx.authorize(db, &company)?;
            validate_name(&self.name)?;
            validate_prices(self.price_per_unit, self.price_max)?;

            let now = Utc::now();
            let item = Item {
                id: ItemId::new(),
                company: company.id,
                name: self.name.clone(),
                description: self.description.clone(),
                price_per_unit: self.price_per_unit,
                price_max: self.price_max,
                created_on: now,
                modified_on: now,
            };
            db.insert_item(&item, &company)?;

            // the item row exists now, so values can point at it
            let fields = reconcile_custom_fields(
                db,
                company.id,
                HostRef::Item(item.id),
                self.custom_fields.as_ref(),
                WriteMode::Full,
            )?;
            item_json(&item, fields)
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
