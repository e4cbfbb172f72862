//! Core custom field types.
//!
//! A field's data type fixes what shape its values take. Host entity types name
//! the kinds of business objects a field definition can attach to. Values are a
//! closed sum type serialized as plain JSON scalars.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FieldsError, Result};

/// Declared type of a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDataType {
    Text,
    Number,
    Boolean,
}

impl FieldDataType {
    pub const ALL: [FieldDataType; 3] = [Self::Text, Self::Number, Self::Boolean];

    /// Stable integer code used in storage.
    pub fn code(self) -> i64 {
        match self {
            Self::Text => 1,
            Self::Number => 2,
            Self::Boolean => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Self::Text),
            2 => Ok(Self::Number),
            3 => Ok(Self::Boolean),
            other => Err(FieldsError::UnknownDataType {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Display label for form builders.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for FieldDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldDataType {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldsError::UnknownDataType {
                value: s.to_string(),
            })
    }
}

/// Kinds of host entities that can carry custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostEntityType {
    Company,
    Item,
}

impl HostEntityType {
    pub const ALL: [HostEntityType; 2] = [Self::Company, Self::Item];

    /// Stable identifier used by clients and in storage.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Item => "item",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Item => "Item",
        }
    }
}

impl fmt::Display for HostEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for HostEntityType {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self> {
        resolve_entity_type(s)
    }
}

/// Map a client-supplied identifier to a host entity kind (case-insensitive).
pub fn resolve_entity_type(identifier: &str) -> Result<HostEntityType> {
    HostEntityType::ALL
        .into_iter()
        .find(|t| t.slug().eq_ignore_ascii_case(identifier.trim()))
        .ok_or_else(|| FieldsError::UnknownModelType {
            identifier: identifier.to_string(),
        })
}

/// A stored custom field value.
///
/// Serializes untagged, so `Text("Senior")` is `"Senior"` and `Null` is `null`.
/// Numbers keep their JSON representation: an integer written in reads back as
/// an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    /// Whether this value may be stored in a field of `data_type`. Null always may.
    pub fn conforms_to(&self, data_type: FieldDataType) -> bool {
        matches!(
            (self, data_type),
            (Self::Null, _)
                | (Self::Text(_), FieldDataType::Text)
                | (Self::Number(_), FieldDataType::Number)
                | (Self::Bool(_), FieldDataType::Boolean)
        )
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(b),
            FieldValue::Number(n) => serde_json::Value::Number(n),
            FieldValue::Text(s) => serde_json::Value::String(s),
        }
    }
}

/// Rendered custom fields of one host instance, keyed by field key.
pub type FieldMap = BTreeMap<String, FieldValue>;
