//! UpdateCompany command

use std::time::Instant;

use chrono::Utc;
use kompello_fields::validate_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::company_json;
use crate::context::BillingContext;
use crate::custom_fields::{reconcile_custom_fields, CustomFieldInput, WriteMode};
use crate::error::BillingError;
use crate::types::{CompanyId, HostRef};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Update a company's name, description or custom fields
#[operation(
    verb = "update",
    noun = "company",
    description = "Update a company's name, description, or custom fields"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCompany {
    pub id: CompanyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keys present are written (null included); omitted keys stay as they are
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFieldInput>,
}

impl UpdateCompany {
    pub fn new(id: CompanyId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            custom_fields: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_custom_fields(mut self, fields: CustomFieldInput) -> Self {
        self.custom_fields = Some(fields);
        self
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for UpdateCompany {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let mut company = db.company(self.id)?;
            ctx.authorize(db, &company)?;

            if let Some(name) = &self.name {
                validate_name(name)?;
                company.name = name.clone();
            }
            if let Some(description) = &self.description {
                company.description = Some(description.clone());
            }
            if self.name.is_some() || self.description.is_some() {
                company.modified_on = Utc::now();
                db.update_company(&company)?;
            }

            let fields = reconcile_custom_fields(
                db,
                company.id,
                HostRef::Company(company.id),
                self.custom_fields.as_ref(),
                WriteMode::Partial,
            )?;
            company_json(&company, fields)
        });

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
