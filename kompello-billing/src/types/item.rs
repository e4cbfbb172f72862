//! Billable item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CompanyId, ItemId};

/// A billable item template owned by one company.
///
/// `price_per_unit` is the base price. When `price_max` is set the item has a
/// flexible range `[price_per_unit, price_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub company: CompanyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_per_unit: f64,
    #[serde(default)]
    pub price_max: Option<f64>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}
