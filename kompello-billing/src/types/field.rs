//! Custom field definition records

use chrono::{DateTime, Utc};
use kompello_fields::{FieldDataType, HostEntityType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{CompanyId, FieldId};

/// Schema of one tenant-defined attribute on one host entity kind.
///
/// `(key, model_type, company)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub key: String,
    pub name: String,
    pub data_type: FieldDataType,
    pub model_type: HostEntityType,
    pub company: CompanyId,
    pub track_history: bool,
    pub is_archived: bool,
    pub show_in_ui: bool,
    #[serde(default)]
    pub extra_data: Option<Value>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) row_id: i64,
}

/// Input for creating a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFieldDefinition {
    pub key: String,
    pub name: String,
    pub data_type: FieldDataType,
    pub model_type: HostEntityType,
    pub company: CompanyId,
    pub track_history: bool,
    pub show_in_ui: bool,
    pub extra_data: Option<Value>,
}

/// Changes to apply to an existing definition. `None` leaves the attribute alone.
///
/// `extra_data: Some(Value::Null)` clears the metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinitionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<FieldDataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_ui: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_history: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Value>,
}

impl FieldDefinitionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
