//! Field value store, addressed generically by [`HostRef`]

use chrono::Utc;
use kompello_fields::{FieldMap, FieldValue};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::Result;
use crate::types::{FieldDefinition, HostRef};

pub struct ValueStore<'c> {
    conn: &'c Connection,
}

impl<'c> ValueStore<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create or replace the value of `definition` on `host`.
    ///
    /// Does no validation of its own; callers go through the custom field
    /// reconciliation, which checks type and archive state first.
    pub(crate) fn upsert(
        &self,
        definition: &FieldDefinition,
        host: HostRef,
        value: &FieldValue,
    ) -> Result<()> {
        let now = Utc::now();
        self.conn
            .prepare_cached(
                "INSERT INTO custom_field_values
                    (uuid, definition_id, host_type, host_id, value, created_on, modified_on)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                 ON CONFLICT (definition_id, host_id)
                 DO UPDATE SET value = excluded.value, modified_on = excluded.modified_on",
            )?
            .execute(params![
                Uuid::new_v4().to_string(),
                definition.row_id,
                host.entity_type().slug(),
                host.instance_key(),
                serde_json::to_string(value)?,
                now
            ])?;
        Ok(())
    }

    /// Every stored value of one host instance, keyed by field key.
    pub fn get_all_for_instance(&self, host: HostRef) -> Result<FieldMap> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT d.key, v.value
             FROM custom_field_values v
             JOIN custom_field_definitions d ON d.id = v.definition_id
             WHERE v.host_type = ?1 AND v.host_id = ?2",
        )?;
        let rows = stmt
            .query_map(
                params![host.entity_type().slug(), host.instance_key()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut fields = FieldMap::new();
        for (key, raw) in rows {
            fields.insert(key, serde_json::from_str(&raw)?);
        }
        Ok(fields)
    }

    /// Number of host instances holding a value for `definition`.
    pub fn count(&self, definition: &FieldDefinition) -> Result<u64> {
        let count: i64 = self
            .conn
            .prepare_cached("SELECT COUNT(*) FROM custom_field_values WHERE definition_id = ?1")?
            .query_row(params![definition.row_id], |row| row.get(0))?;
        Ok(count as u64)
    }
}
