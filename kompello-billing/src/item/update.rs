//! UpdateItem command

use std::time::Instant;

use chrono::Utc;
use kompello_fields::validate_name;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{item_json, validate_prices};
use crate::context::BillingContext;
use crate::custom_fields::{reconcile_custom_fields, CustomFieldInput, WriteMode};
use crate::error::BillingError;
use crate::types::{HostRef, ItemId};
use kompello_operations::{async_trait, operation, Execute, ExecutionResult, Operation};

/// Partially update an item. The owning company cannot change.
#[operation(
    verb = "update",
    noun = "item",
    description = "Update an item's attributes or custom fields"
)]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateItem {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    /// `Some(None)` clears the maximum, turning a ranged item back into a
    /// fixed-price one; over JSON that is an explicit `"price_max": null`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_max: Option<Option<f64>>,
    /// Keys present are written (null included); omitted keys stay as they are
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<CustomFieldInput>,
}

impl UpdateItem {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            price_per_unit: None,
            price_max: None,
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

    pub fn with_price_per_unit(mut self, price_per_unit: f64) -> Self {
        self.price_per_unit = Some(price_per_unit);
        self
    }

    pub fn with_price_max(mut self, price_max: f64) -> Self {
        self.price_max = Some(Some(price_max));
        self
    }

    pub fn clear_price_max(mut self) -> Self {
        self.price_max = Some(None);
        self
    }

    pub fn with_custom_fields(mut self, fields: CustomFieldInput) -> Self {
        self.custom_fields = Some(fields);
        self
    }

    fn changes_attributes(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.price_per_unit.is_some()
            || self.price_max.is_some()
    }
}

/// Keeps a present `null` apart from an absent key; `default` covers absence.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

#[async_trait]
impl Execute<BillingContext, BillingError> for UpdateItem {
    async fn execute(&self, ctx: &BillingContext) -> ExecutionResult<Value, BillingError> {
        let start = Instant::now();
        let input = serde_json::to_value(self).unwrap_or_default();

        let result = ctx.write(|db| {
            let mut item = db.item(self.id)?;
            ctx.authorize(db, &db.company(item.company)?)?;

            if self.changes_attributes() {
                if let Some(name) = &self.name {
                    validate_name(name)?;
                    item.name = name.clone();
                }
                if let Some(description) = &self.description {
                    item.description = description.clone();
                }
                if let Some(price_per_unit) = self.price_per_unit {
                    item.price_per_unit = price_per_unit;
                }
                if let Some(price_max) = self.price_max {
                    item.price_max = price_max;
                }
                validate_prices(item.price_per_unit, item.price_max)?;
                item.modified_on = Utc::now();
                db.update_item(&item)?;
            }

            let fields = reconcile_custom_fields(
                db,
                item.company,
                HostRef::Item(item.id),
                self.custom_fields.as_ref(),
                WriteMode::Partial,
            )?;
            item_json(&item, fields)
        });

        ExecutionResult::mutation(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::AddItem;
    use serde_json::json;

    #[test]
    fn test_price_max_null_is_kept_apart_from_absent() {
        let id = ItemId::new();
        let cleared: UpdateItem =
            serde_json::from_value(json!({"id": id, "price_max": null})).unwrap();
        assert_eq!(cleared.price_max, Some(None));
        assert!(cleared.changes_attributes());

        let untouched: UpdateItem = serde_json::from_value(json!({"id": id})).unwrap();
        assert_eq!(untouched.price_max, None);
        assert!(!untouched.changes_attributes());

        let set: UpdateItem = serde_json::from_value(json!({"id": id, "price_max": 7.5})).unwrap();
        assert_eq!(set.price_max, Some(Some(7.5)));
        let serialized = serde_json::to_value(&cleared).unwrap();
        assert_eq!(serialized["price_max"], Value::Null);
    }

    #[tokio::test]
    async fn test_null_price_max_clears_range() {
        let ctx = BillingContext::open_in_memory().unwrap();
        let company = ctx.write(|db| db.insert_company("Acme", None)).unwrap();
        let added = AddItem::new(company.id, "Consulting", 2.0)
            .with_price_max(5.0)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(added["price_max"], json!(5.0));
        let id: ItemId = serde_json::from_value(added["id"].clone()).unwrap();

        let update: UpdateItem =
            serde_json::from_value(json!({"id": id, "name": "Support"})).unwrap();
        let kept = update.execute(&ctx).await.into_result().unwrap();
        assert_eq!(kept["price_max"], json!(5.0));

        let update: UpdateItem =
            serde_json::from_value(json!({"id": id, "price_max": null})).unwrap();
        let cleared = update.execute(&ctx).await.into_result().unwrap();
        assert_eq!(cleared["price_max"], Value::Null);

        let stored = ctx.read(|db| db.item(id)).unwrap();
        assert_eq!(stored.price_max, None);
        assert_eq!(stored.name, "Support");
    }
}
