//! SQLite schema
//!
//! - `companies`, `company_members`: tenants and who may act for them
//! - `items`: billable items, one company each
//! - `custom_field_definitions`: per-tenant field schemas, unique per
//!   `(key, model_type, company_id)`
//! - `custom_field_values`: one JSON value per `(definition_id, host_id)`;
//!   a definition cannot be deleted while values reference it

use rusqlite::Connection;

pub(crate) fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT,
            created_on TEXT NOT NULL,
            modified_on TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS company_members (
            company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            PRIMARY KEY (company_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            company_id INTEGER NOT NULL REFERENCES companies(id),
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price_per_unit REAL NOT NULL,
            price_max REAL,
            created_on TEXT NOT NULL,
            modified_on TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS custom_field_definitions (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            key TEXT NOT NULL,
            name TEXT NOT NULL,
            data_type INTEGER NOT NULL,
            model_type TEXT NOT NULL,
            company_id INTEGER NOT NULL REFERENCES companies(id),
            track_history INTEGER NOT NULL DEFAULT 1,
            is_archived INTEGER NOT NULL DEFAULT 0,
            show_in_ui INTEGER NOT NULL DEFAULT 1,
            extra_data TEXT,
            created_on TEXT NOT NULL,
            modified_on TEXT NOT NULL,
            UNIQUE (key, model_type, company_id)
        );

        CREATE TABLE IF NOT EXISTS custom_field_values (
            id INTEGER PRIMARY KEY,
            uuid TEXT NOT NULL UNIQUE,
            definition_id INTEGER NOT NULL
                REFERENCES custom_field_definitions(id) ON DELETE RESTRICT,
            host_type TEXT NOT NULL,
            host_id TEXT NOT NULL,
            value TEXT NOT NULL,
            created_on TEXT NOT NULL,
            modified_on TEXT NOT NULL,
            UNIQUE (definition_id, host_id)
        );

        CREATE INDEX IF NOT EXISTS idx_items_company ON items(company_id);
        CREATE INDEX IF NOT EXISTS idx_definitions_scope
            ON custom_field_definitions(company_id, model_type);
        CREATE INDEX IF NOT EXISTS idx_values_host ON custom_field_values(host_type, host_id);
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
    }
}
