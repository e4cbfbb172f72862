//! ListItems command

use serde::Deserialize;
use serde_json::Value;

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::CompanyId;
use kompello_operations::{async_trait, operation, Execute, ExecutionResult};

/// List a company's items, newest first. Custom fields are not included.
#[operation(verb = "list", noun = "items", description = "List a company's items")]
#[derive(Debug, Deserialize)]
pub struct ListItems {
    pub company: CompanyId,
}

impl ListItems {
    pub fn new(company: CompanyId) -> Self {
        Self { company }
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for ListItems {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        ExecutionResult::read(ctx.read(|db| {
            let company = db.company(self.company)?;
            ctx.authorize(db, &company)?;
            let items = db.list_items(&company)?;
            Ok(serde_json::json!({
                "items": items,
                "count": items.len()
            }))
        }))
    }
}
