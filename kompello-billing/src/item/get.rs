//! GetItem command

use serde::Deserialize;
use serde_json::Value;

use super::item_json;
use crate::context::BillingContext;
use crate::custom_fields::render_custom_fields;
use crate::error::BillingError;
use crate::types::{HostRef, ItemId};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get an item with its custom fields
#[operation(verb = "get", noun = "item", description = "Get an item by ID")]
#[derive(Debug, Deserialize)]
pub struct GetItem {
    pub id: ItemId,
}

impl GetItem {
    pub fn new(id: ItemId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BillingContext, BillingError> for GetItem {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        ExecutionResult::read(ctx.read(|db| {
            let item = db.item(self.id)?;
            ctx.authorize(db, &db.company(item.company)?)?;
            let fields = render_custom_fields(db, HostRef::Item(item.id))?;
            item_json(&item, fields)
        }))
    }
}
