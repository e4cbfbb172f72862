//! Custom field schema types and value validation
//!
//! `kompello-fields` is a schema-only crate. It knows which data types a custom
//! field can have, which host entity kinds can carry custom fields, and how a
//! raw JSON value is checked against a declared type. It knows nothing about
//! tenants, storage or transactions; `kompello-billing` owns those.
//!
//! # Architecture
//!
//! - **Closed value type**: [`FieldValue`] is `Null | Bool | Number | Text`
//! - **Parse, don't check**: [`validate_value`] turns a raw JSON value into a
//!   typed [`FieldValue`] or a [`FieldsError::TypeMismatch`]
//! - **Explicit host registry**: [`HostEntityType`] lists every entity kind that
//!   can own custom fields; [`resolve_entity_type`] maps client identifiers onto it

pub mod error;
pub mod metadata;
pub mod types;
pub mod validation;

pub use error::{FieldsError, Result};
pub use metadata::{DataTypeChoice, FieldMetadata, ModelTypeChoice};
pub use types::{resolve_entity_type, FieldDataType, FieldMap, FieldValue, HostEntityType};
pub use validation::{validate_key, validate_name, validate_value, MAX_LABEL_LEN};
