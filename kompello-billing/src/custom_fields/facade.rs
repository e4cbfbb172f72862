//! Custom field integration for host entities
//!
//! Host entity operations call [`reconcile_custom_fields`] inside the same
//! `write` transaction that persists the host itself, and
//! [`render_custom_fields`] when building their read representation.

use std::collections::BTreeMap;

use kompello_fields::{validate_value, FieldMap, FieldValue};
use serde_json::Value;
use tracing::debug;

use crate::context::Db;
use crate::error::{BillingError, Result};
use crate::types::{CompanyId, FieldDefinition, HostRef};

/// Raw `key -> value` map as supplied by a client
pub type CustomFieldInput = BTreeMap<String, Value>;

/// Whether the host write is a full create or a partial update.
///
/// Reconciliation never removes values, so both modes touch exactly the
/// supplied keys; the mode is recorded for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Full,
    Partial,
}

/// Validate and store `fields` for `host`, returning the full reconciled map.
///
/// `None` (not provided) and an empty map leave stored values alone. Every
/// key is resolved and validated before anything is written, so a bad key
/// aborts the whole request; callers run this inside [`BillingContext::write`]
/// so the host's own changes roll back with it.
///
/// [`BillingContext::write`]: crate::BillingContext::write
pub fn reconcile_custom_fields(
    db: &Db<'_>,
    company: CompanyId,
    host: HostRef,
    fields: Option<&CustomFieldInput>,
    mode: WriteMode,
) -> Result<FieldMap> {
    let values = db.values();
    let Some(fields) = fields.filter(|fields| !fields.is_empty()) else {
        return values.get_all_for_instance(host);
    };

    let registry = db.registry();
    let mut resolved: Vec<(FieldDefinition, FieldValue)> = Vec::with_capacity(fields.len());
    for (key, raw) in fields {
        let definition = registry
            .find(key, host.entity_type(), company)?
            .ok_or_else(|| {
                BillingError::validation(
                    "custom_fields",
                    format!("custom field '{key}' does not exist for this model and tenant"),
                )
            })?;
        if definition.is_archived {
            return Err(BillingError::ArchivedField { key: key.clone() });
        }
        let value = validate_value(key, definition.data_type, raw)?;
        resolved.push((definition, value));
    }

    for (definition, value) in &resolved {
        values.upsert(definition, host, value)?;
    }
    debug!(%host, ?mode, keys = resolved.len(), "reconciled custom fields");

    values.get_all_for_instance(host)
}

/// Stored custom fields of `host`; an empty map when it has none.
pub fn render_custom_fields(db: &Db<'_>, host: HostRef) -> Result<FieldMap> {
    db.values().get_all_for_instance(host)
}

/// Attach `fields` to a serialized host under `custom_fields`.
pub(crate) fn with_custom_fields(mut host: Value, fields: FieldMap) -> Result<Value> {
    if let Value::Object(map) = &mut host {
        map.insert("custom_fields".to_string(), serde_json::to_value(fields)?);
    }
    Ok(host)
}
