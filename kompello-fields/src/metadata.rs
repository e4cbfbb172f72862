//! Static metadata for clients building custom field forms.

use serde::Serialize;

use crate::types::{FieldDataType, HostEntityType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelTypeChoice {
    pub id: HostEntityType,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTypeChoice {
    pub value: FieldDataType,
    pub label: &'static str,
}

/// `{model_types: [{id, label}], data_types: [{value, label}]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetadata {
    pub model_types: Vec<ModelTypeChoice>,
    pub data_types: Vec<DataTypeChoice>,
}

impl FieldMetadata {
    pub fn current() -> Self {
        Self {
            model_types: list_model_types(),
            data_types: list_data_type_choices(),
        }
    }
}

pub fn list_model_types() -> Vec<ModelTypeChoice> {
    HostEntityType::ALL
        .into_iter()
        .map(|id| ModelTypeChoice {
            id,
            label: id.label(),
        })
        .collect()
}

pub fn list_data_type_choices() -> Vec<DataTypeChoice> {
    FieldDataType::ALL
        .into_iter()
        .map(|value| DataTypeChoice {
            value,
            label: value.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_shape() {
        let json = serde_json::to_value(FieldMetadata::current()).unwrap();
        assert_eq!(
            json["data_types"],
            json!([
                {"value": "text", "label": "Text"},
                {"value": "number", "label": "Number"},
                {"value": "boolean", "label": "Boolean"},
            ])
        );
        assert_eq!(
            json["model_types"][1],
            json!({"id": "item", "label": "Item"})
        );
    }
}
