//! Company (tenant)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CompanyId;

/// A company is the isolation boundary for items and custom field definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) row_id: i64,
}
