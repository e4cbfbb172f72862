//! Field definition registry
//!
//! CRUD over [`FieldDefinition`] rows with tenant scoping and the guards that
//! keep stored values meaningful: a definition's data type is frozen once
//! values exist, and a definition with values cannot be deleted.

use chrono::Utc;
use kompello_fields::{
    resolve_entity_type, validate_key, validate_name, FieldDataType, HostEntityType,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::values::ValueStore;
use crate::error::{is_unique_violation, BillingError, Result};
use crate::types::{CompanyId, FieldDefinition, FieldDefinitionPatch, FieldId, NewFieldDefinition};

const DEFINITION_COLUMNS: &str = "d.id, d.uuid, d.key, d.name, d.data_type, d.model_type, c.uuid, \
     d.track_history, d.is_archived, d.show_in_ui, d.extra_data, d.created_on, d.modified_on";

const DEFINITION_FROM: &str = "custom_field_definitions d JOIN companies c ON c.id = d.company_id";

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn definition_from_row(row: &Row<'_>) -> rusqlite::Result<FieldDefinition> {
    let data_type = FieldDataType::from_code(row.get(4)?)
        .map_err(|e| conversion_error(4, Type::Integer, e))?;
    let model_type: String = row.get(5)?;
    let model_type =
        resolve_entity_type(&model_type).map_err(|e| conversion_error(5, Type::Text, e))?;
    let extra_data = row
        .get::<_, Option<String>>(10)?
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| conversion_error(10, Type::Text, e))?;

    Ok(FieldDefinition {
        row_id: row.get(0)?,
        id: row.get(1)?,
        key: row.get(2)?,
        name: row.get(3)?,
        data_type,
        model_type,
        company: row.get(6)?,
        track_history: row.get(7)?,
        is_archived: row.get(8)?,
        show_in_ui: row.get(9)?,
        extra_data,
        created_on: row.get(11)?,
        modified_on: row.get(12)?,
    })
}

fn encode_extra_data(extra_data: &Option<serde_json::Value>) -> Result<Option<String>> {
    match extra_data {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::to_string(value)?)),
    }
}

/// Access to custom field definitions within one connection or transaction
pub struct Registry<'c> {
    conn: &'c Connection,
}

impl<'c> Registry<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Register a new definition.
    ///
    /// Fails with `Validation` for a bad key/name or an unknown company, and
    /// with `Conflict` when `(key, model_type, company)` is already taken.
    pub fn create(&self, new: NewFieldDefinition) -> Result<FieldDefinition> {
        validate_key(&new.key)?;
        validate_name(&new.name)?;

        let company_row: i64 = self
            .conn
            .prepare_cached("SELECT id FROM companies WHERE uuid = ?1")?
            .query_row(params![new.company], |row| row.get(0))
            .optional()?
            .ok_or_else(|| {
                BillingError::validation(
                    "company",
                    format!("company {} does not exist", new.company),
                )
            })?;

        let id = FieldId::new();
        let now = Utc::now();
        let inserted = self.conn.execute(
            "INSERT INTO custom_field_definitions
                (uuid, key, name, data_type, model_type, company_id, track_history, is_archived,
                 show_in_ui, extra_data, created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9, ?10, ?10)",
            params![
                id,
                new.key,
                new.name,
                new.data_type.code(),
                new.model_type.slug(),
                company_row,
                new.track_history,
                new.show_in_ui,
                encode_extra_data(&new.extra_data)?,
                now
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(BillingError::conflict(format!(
                    "custom field '{}' already exists for {} in company {}",
                    new.key, new.model_type, new.company
                )));
            }
            Err(e) => return Err(e.into()),
        }

        debug!(
            field = %id,
            key = %new.key,
            model_type = %new.model_type,
            company = %new.company,
            "created custom field definition"
        );
        Ok(FieldDefinition {
            id,
            key: new.key,
            name: new.name,
            data_type: new.data_type,
            model_type: new.model_type,
            company: new.company,
            track_history: new.track_history,
            is_archived: false,
            show_in_ui: new.show_in_ui,
            extra_data: new.extra_data.filter(|v| !v.is_null()),
            created_on: now,
            modified_on: now,
            row_id: self.conn.last_insert_rowid(),
        })
    }

    /// Load a definition by id, failing with `NotFound` when absent.
    pub fn get(&self, id: FieldId) -> Result<FieldDefinition> {
        self.conn
            .prepare_cached(&format!(
                "SELECT {DEFINITION_COLUMNS} FROM {DEFINITION_FROM} WHERE d.uuid = ?1"
            ))?
            .query_row(params![id], definition_from_row)
            .optional()?
            .ok_or_else(|| BillingError::not_found("custom field", id))
    }

    /// Resolve `key` within one tenant and host kind.
    pub fn find(
        &self,
        key: &str,
        model_type: HostEntityType,
        company: CompanyId,
    ) -> Result<Option<FieldDefinition>> {
        let definition = self
            .conn
            .prepare_cached(&format!(
                "SELECT {DEFINITION_COLUMNS} FROM {DEFINITION_FROM}
                 WHERE d.key = ?1 AND d.model_type = ?2 AND c.uuid = ?3"
            ))?
            .query_row(
                params![key, model_type.slug(), company],
                definition_from_row,
            )
            .optional()?;
        Ok(definition)
    }

    /// Apply `patch`. Only a data type change is restricted: it fails with
    /// `Conflict` while any value references the definition. An empty patch
    /// leaves the row, `modified_on` included, untouched.
    pub fn update(&self, id: FieldId, patch: FieldDefinitionPatch) -> Result<FieldDefinition> {
        let mut definition = self.get(id)?;
        if patch.is_empty() {
            return Ok(definition);
        }

        if let Some(data_type) = patch.data_type {
            if data_type != definition.data_type {
                let count = ValueStore::new(self.conn).count(&definition)?;
                if count > 0 {
                    return Err(BillingError::conflict(format!(
                        "cannot change data type of custom field '{}' while {count} values exist",
                        definition.key
                    )));
                }
                definition.data_type = data_type;
            }
        }
        if let Some(name) = patch.name {
            validate_name(&name)?;
            definition.name = name;
        }
        if let Some(is_archived) = patch.is_archived {
            definition.is_archived = is_archived;
        }
        if let Some(show_in_ui) = patch.show_in_ui {
            definition.show_in_ui = show_in_ui;
        }
        if let Some(track_history) = patch.track_history {
            definition.track_history = track_history;
        }
        if let Some(extra_data) = patch.extra_data {
            definition.extra_data = Some(extra_data).filter(|v| !v.is_null());
        }
        definition.modified_on = Utc::now();

        self.conn.execute(
            "UPDATE custom_field_definitions
             SET name = ?1, data_type = ?2, is_archived = ?3, show_in_ui = ?4, track_history = ?5,
                 extra_data = ?6, modified_on = ?7
             WHERE id = ?8",
            params![
                definition.name,
                definition.data_type.code(),
                definition.is_archived,
                definition.show_in_ui,
                definition.track_history,
                encode_extra_data(&definition.extra_data)?,
                definition.modified_on,
                definition.row_id
            ],
        )?;
        debug!(
            field = %id,
            key = %definition.key,
            archived = definition.is_archived,
            "updated custom field definition"
        );
        Ok(definition)
    }

    /// Remove a definition that no value references.
    pub fn delete(&self, id: FieldId) -> Result<FieldDefinition> {
        let definition = self.get(id)?;
        let count = ValueStore::new(self.conn).count(&definition)?;
        if count > 0 {
            return Err(BillingError::conflict(format!(
                "cannot delete custom field definition '{}' with {count} existing values; \
                 this would result in data loss",
                definition.key
            )));
        }
        self.conn.execute(
            "DELETE FROM custom_field_definitions WHERE id = ?1",
            params![definition.row_id],
        )?;
        debug!(field = %id, key = %definition.key, "deleted custom field definition");
        Ok(definition)
    }

    /// Definitions of one tenant for one host kind, ordered by name.
    /// Archived definitions are left out unless `include_archived` is set.
    pub fn list_for_tenant_and_type(
        &self,
        company: CompanyId,
        model_type: HostEntityType,
        show_in_ui_only: bool,
        include_archived: bool,
    ) -> Result<Vec<FieldDefinition>> {
        self.list(company, Some(model_type), show_in_ui_only, include_archived)
    }

    /// Like [`Self::list_for_tenant_and_type`] across every host kind.
    pub fn list_for_tenant(
        &self,
        company: CompanyId,
        include_archived: bool,
    ) -> Result<Vec<FieldDefinition>> {
        self.list(company, None, false, include_archived)
    }

    fn list(
        &self,
        company: CompanyId,
        model_type: Option<HostEntityType>,
        show_in_ui_only: bool,
        include_archived: bool,
    ) -> Result<Vec<FieldDefinition>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {DEFINITION_COLUMNS} FROM {DEFINITION_FROM}
             WHERE c.uuid = ?1
               AND (?2 IS NULL OR d.model_type = ?2)
               AND (?3 = 0 OR d.show_in_ui = 1)
               AND (?4 = 1 OR d.is_archived = 0)
             ORDER BY d.name, d.key"
        ))?;
        let definitions = stmt
            .query_map(
                params![
                    company,
                    model_type.map(HostEntityType::slug),
                    show_in_ui_only,
                    include_archived
                ],
                definition_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BillingContext;
    use crate::types::HostRef;
    use kompello_fields::FieldValue;
    use serde_json::json;

    fn new_field(
        company: CompanyId,
        key: &str,
        name: &str,
        data_type: FieldDataType,
    ) -> NewFieldDefinition {
        NewFieldDefinition {
            key: key.to_string(),
            name: name.to_string(),
            data_type,
            model_type: HostEntityType::Item,
            company,
            track_history: true,
            show_in_ui: true,
            extra_data: None,
        }
    }

    fn setup() -> (BillingContext, CompanyId) {
        let ctx = BillingContext::open_in_memory().unwrap();
        let company = ctx.write(|db| db.insert_company("Acme", None)).unwrap();
        (ctx, company.id)
    }

    #[test]
    fn test_create_and_get() {
        let (ctx, company) = setup();
        let created = ctx
            .write(|db| {
                db.registry().create(NewFieldDefinition {
                    extra_data: Some(json!({"min": 0})),
                    ..new_field(company, "max_hours", "Max Hours", FieldDataType::Number)
                })
            })
            .unwrap();

        let loaded = ctx.read(|db| db.registry().get(created.id)).unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.extra_data, Some(json!({"min": 0})));
        assert!(!loaded.is_archived);
    }

    #[test]
    fn test_duplicate_key_is_conflict() {
        let (ctx, company) = setup();
        let field = new_field(company, "skill_level", "Skill", FieldDataType::Text);
        ctx.write(|db| db.registry().create(field.clone())).unwrap();

        let err = ctx
            .write(|db| db.registry().create(field.clone()))
            .unwrap_err();
        assert!(matches!(err, BillingError::Conflict { .. }));

        // same key on another host kind is a different definition
        ctx.write(|db| {
            db.registry().create(NewFieldDefinition {
                model_type: HostEntityType::Company,
                ..field
            })
        })
        .unwrap();
    }

    #[test]
    fn test_unknown_company_is_validation_error() {
        let (ctx, _) = setup();
        let err = ctx
            .write(|db| {
                db.registry()
                    .create(new_field(CompanyId::new(), "k", "K", FieldDataType::Text))
            })
            .unwrap_err();
        match err {
            BillingError::Validation { field, .. } => assert_eq!(field, "company"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_list_is_sorted_and_hides_archived() {
        let (ctx, company) = setup();
        ctx.write(|db| {
            let registry = db.registry();
            registry.create(new_field(company, "zeta", "Zeta", FieldDataType::Text))?;
            registry.create(new_field(company, "alpha", "Alpha", FieldDataType::Text))?;
            registry.create(NewFieldDefinition {
                show_in_ui: false,
                ..new_field(company, "internal", "Internal", FieldDataType::Boolean)
            })?;
            let old = registry.create(new_field(company, "old", "Beta", FieldDataType::Text))?;
            registry.update(
                old.id,
                FieldDefinitionPatch {
                    is_archived: Some(true),
                    ..Default::default()
                },
            )?;
            Ok(())
        })
        .unwrap();

        let names = |show_in_ui_only, include_archived| {
            ctx.read(|db| {
                db.registry().list_for_tenant_and_type(
                    company,
                    HostEntityType::Item,
                    show_in_ui_only,
                    include_archived,
                )
            })
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect::<Vec<_>>()
        };

        assert_eq!(names(false, false), vec!["Alpha", "Internal", "Zeta"]);
        assert_eq!(names(true, false), vec!["Alpha", "Zeta"]);
        assert_eq!(
            names(false, true),
            vec!["Alpha", "Beta", "Internal", "Zeta"]
        );
    }

    #[test]
    fn test_type_change_and_delete_guards() {
        let (ctx, company) = setup();
        let definition = ctx
            .write(|db| {
                db.registry()
                    .create(new_field(company, "max_hours", "Max", FieldDataType::Number))
            })
            .unwrap();

        // no values yet: both are allowed
        let to_text = FieldDefinitionPatch {
            data_type: Some(FieldDataType::Text),
            ..Default::default()
        };
        let changed = ctx
            .write(|db| db.registry().update(definition.id, to_text))
            .unwrap();
        assert_eq!(changed.data_type, FieldDataType::Text);

        let host = HostRef::Item(crate::types::ItemId::new());
        ctx.write(|db| db.values().upsert(&changed, host, &FieldValue::from("x")))
            .unwrap();

        let back_to_number = FieldDefinitionPatch {
            data_type: Some(FieldDataType::Number),
            ..Default::default()
        };
        let err = ctx
            .write(|db| db.registry().update(definition.id, back_to_number))
            .unwrap_err();
        assert!(matches!(err, BillingError::Conflict { .. }));

        let err = ctx
            .write(|db| db.registry().delete(definition.id))
            .unwrap_err();
        assert!(err.to_string().contains("data loss"));
        assert!(ctx.read(|db| db.registry().get(definition.id)).is_ok());
    }

    #[test]
    fn test_delete_unused_definition() {
        let (ctx, company) = setup();
        let definition = ctx
            .write(|db| {
                db.registry()
                    .create(new_field(company, "k", "K", FieldDataType::Boolean))
            })
            .unwrap();
        ctx.write(|db| db.registry().delete(definition.id)).unwrap();
        let err = ctx.read(|db| db.registry().get(definition.id)).unwrap_err();
        assert!(matches!(err, BillingError::NotFound { .. }));
    }

    #[test]
    fn test_empty_patch_leaves_definition_untouched() {
        let (ctx, company) = setup();
        let definition = ctx
            .write(|db| {
                db.registry()
                    .create(new_field(company, "skill_level", "Skill", FieldDataType::Text))
            })
            .unwrap();

        let patch = FieldDefinitionPatch::default();
        assert!(patch.is_empty());
        let unchanged = ctx
            .write(|db| db.registry().update(definition.id, patch))
            .unwrap();
        assert_eq!(unchanged, definition);

        let renamed = ctx
            .write(|db| {
                db.registry().update(
                    definition.id,
                    FieldDefinitionPatch {
                        name: Some("Skill Level".into()),
                        ..Default::default()
                    },
                )
            })
            .unwrap();
        assert_eq!(renamed.name, "Skill Level");
        assert!(renamed.modified_on >= definition.modified_on);
        let stored = ctx.read(|db| db.registry().get(definition.id)).unwrap();
        assert_eq!(stored, renamed);
    }
}
