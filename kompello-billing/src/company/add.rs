//! AddCompany command

use std::time::Instant;

use kompello_fields::{validate_name, FieldMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::company_json;
use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::UserId;
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Create a company (tenant). Administrators only.
#[operation(verb = "add", noun = "company", description = "Create a new company")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCompany {
    pub name: String,
    pub description: Option<String>,
    /// Users that become members right away
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<UserId>,
}

impl AddCompany {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_member(mut self, user: impl Into<UserId>) -> Self {
        self.members.push(user.into());
        self
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for AddCompany {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.require_admin("creating a company").and_then(|()| {
            validate_name(&self.name)?;
            ctx.write(|db| {
                let company = db.insert_company(&self.name, self.description.as_deref())?;
                for user in &self.members {
                    db.add_member(&company, user)?;
                }
                // definitions are scoped to the company, so a new one has no values yet
                company_json(&company, FieldMap::new())
            })
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
