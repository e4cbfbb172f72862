//! ListFields command

use kompello_fields::resolve_entity_type;
use serde::Deserialize;
use serde_json::Value;

use crate::context::BillingContext;
use crate::error::BillingError;
use crate::types::CompanyId;
use kompello_operations::{async_trait, operation, Execute, ExecutionResult};

/// List custom field definitions, ordered by name.
///
/// Without `company`, covers every company the actor belongs to (every
/// company for admins).
#[operation(
    verb = "list",
    noun = "fields",
    description = "List custom field definitions visible to the actor"
)]
#[derive(Debug, Default, Deserialize)]
pub struct ListFields {
    #[serde(default)]
    pub company: Option<CompanyId>,
    /// Host entity kind slug; all kinds when absent
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub show_in_ui_only: bool,
    #[serde(default)]
    pub include_archived: bool,
}

impl ListFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_company(company: CompanyId) -> Self {
        Self {
            company: Some(company),
            ..Self::default()
        }
    }

    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn show_in_ui_only(mut self) -> Self {
        self.show_in_ui_only = true;
        self
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for ListFields {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        ExecutionResult::read(ctx.read(|db| {
            let model_type = self
                .model_type
                .as_deref()
                .map(resolve_entity_type)
                .transpose()?;

            let companies = match self.company {
                Some(id) => {
                    ctx.authorize(db, &db.company(id)?)?;
                    vec![id]
                }
                None if ctx.actor().is_admin => db.all_companies()?,
                None => db.member_companies(&ctx.actor().user)?,
            };

            let registry = db.registry();
            let mut fields = Vec::new();
            for company in companies {
                let definitions = match model_type {
                    Some(model_type) => registry.list_for_tenant_and_type(
                        company,
                        model_type,
                        self.show_in_ui_only,
                        self.include_archived,
                    )?,
                    None => registry
                        .list_for_tenant(company, self.include_archived)?
                        .into_iter()
                        .filter(|d| d.show_in_ui || !self.show_in_ui_only)
                        .collect(),
                };
                fields.extend(definitions);
            }
            fields.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));

            Ok(serde_json::json!({
                "count": fields.len(),
                "fields": fields,
            }))
        }))
    }
}
