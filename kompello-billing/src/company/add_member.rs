//! AddMember command

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::{CompanyId, UserId};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Grant a user access to a company. Admins and existing members may do this.
#[operation(verb = "add", noun = "member", description = "Add a user to a company")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddMember {
    pub company: CompanyId,
    pub user: UserId,
}

impl AddMember {
    pub fn new(company: CompanyId, user: impl Into<UserId>) -> Self {
        Self {
            company,
            user: user.into(),
        }
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for AddMember {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let company = db.company(self.company)?;
            ctx.authorize(db, &company)?;
            db.add_member(&company, &self.user)?;
            Ok(json!({ "company": company.id, "user": self.user }))
        });

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.company.to_string()]
    }
}
