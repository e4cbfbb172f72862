//! GetCompany command

use serde::Deserialize;
use serde_json::Value;

use super::company_json;
use crate::context::BillingContext;
use crate::custom_fields::render_custom_fields;
use crate::error::BillingError;
use crate::types::{CompanyId, HostRef};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a company with its custom fields
#[operation(verb = "get", noun = "company", description = "Get a company by ID")]
#[derive(Debug, Deserialize)]
pub struct GetCompany {
    pub id: CompanyId,
}

impl GetCompany {
    pub fn new(id: CompanyId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for GetCompany {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        ExecutionResult::read(ctx.read(|db| {
            let company = db.company(self.id)?;
            ctx.authorize(db, &company)?;
            let fields = render_custom_fields(db, HostRef::Company(company.id))?;
            company_json(&company, fields)
        }))
    }
}
