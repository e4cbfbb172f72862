//! BillingContext - storage primitives for the billing engine
//!
//! The context owns the SQLite connection and knows who is acting. It offers
//! data access primitives and transaction boundaries, no business rules;
//! operations do the work.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, warn};

use crate::config::{BillingConfig, DEFAULT_BUSY_TIMEOUT_MS};
use crate::custom_fields::{Registry, ValueStore};
use crate::error::{BillingError, Result};
use crate::schema::create_schema;
use crate::types::{Actor, Company, CompanyId, Item, ItemId, UserId};

/// Context passed to every operation
#[derive(Clone)]
pub struct BillingContext {
    conn: Arc<Mutex<Connection>>,
    actor: Actor,
}

impl BillingContext {
    /// Open (or create) a file-backed database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!(path = %path.as_ref().display(), "opened billing database");
        Self::init(conn, DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, DEFAULT_BUSY_TIMEOUT_MS)
    }

    pub fn from_config(config: &BillingConfig) -> Result<Self> {
        let ctx = match &config.database.path {
            Some(path) => Self::open(path)?,
            None => Self::open_in_memory()?,
        };
        ctx.lock()?
            .busy_timeout(Duration::from_millis(config.database.busy_timeout_ms))?;
        Ok(ctx)
    }

    fn init(conn: Connection, busy_timeout_ms: u64) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        create_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            actor: Actor::system(),
        })
    }

    /// A context sharing this connection, acting as `actor`.
    pub fn for_actor(&self, actor: Actor) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            actor,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| BillingError::storage("billing database lock poisoned"))
    }

    // =========================================================================
    // Transaction boundaries
    // =========================================================================

    /// Run `f` against the connection without a transaction.
    pub fn read<T>(&self, f: impl FnOnce(&Db<'_>) -> Result<T>) -> Result<T> {
        let conn = self.lock()?;
        f(&Db { conn: &conn })
    }

    /// Run `f` inside an IMMEDIATE transaction. Commits when `f` returns `Ok`,
    /// rolls back everything `f` wrote when it returns `Err`.
    pub fn write<T>(&self, f: impl FnOnce(&Db<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = f(&Db { conn: &tx });
        match result {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback()?;
                debug!(error = %err, "rolled back billing transaction");
                Err(err)
            }
        }
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Fail with `Forbidden` unless the actor is an admin or a member of `company`.
    pub fn authorize(&self, db: &Db<'_>, company: &Company) -> Result<()> {
        if self.actor.is_admin || db.is_member(company, &self.actor.user)? {
            return Ok(());
        }
        warn!(user = %self.actor.user, company = %company.id, "rejected non-member access");
        Err(BillingError::forbidden(format!(
            "user '{}' is not a member of company {}",
            self.actor.user, company.id
        )))
    }

    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.actor.is_admin {
            return Ok(());
        }
        warn!(user = %self.actor.user, action, "rejected non-admin action");
        Err(BillingError::forbidden(format!("{action} requires an administrator")))
    }
}

/// Borrowed connection handed to `read` / `write` closures
pub struct Db<'c> {
    conn: &'c Connection,
}

const COMPANY_COLUMNS: &str = "id, uuid, name, description, created_on, modified_on";

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        row_id: row.get(0)?,
        id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_on: row.get(4)?,
        modified_on: row.get(5)?,
    })
}

const ITEM_COLUMNS: &str = "i.uuid, c.uuid, i.name, i.description, i.price_per_unit, \
                            i.price_max, i.created_on, i.modified_on";

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        company: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        price_per_unit: row.get(4)?,
        price_max: row.get(5)?,
        created_on: row.get(6)?,
        modified_on: row.get(7)?,
    })
}

impl<'c> Db<'c> {
    /// Custom field definitions
    pub fn registry(&self) -> Registry<'c> {
        Registry::new(self.conn)
    }

    /// Stored custom field values (read side; writes go through reconciliation)
    pub fn values(&self) -> ValueStore<'c> {
        ValueStore::new(self.conn)
    }

    // =========================================================================
    // Company I/O
    // =========================================================================

    pub fn insert_company(&self, name: &str, description: Option<&str>) -> Result<Company> {
        let id = CompanyId::new();
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO companies (uuid, name, description, created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, name, description, now],
        )?;
        debug!(company = %id, name, "inserted company");
        Ok(Company {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            created_on: now,
            modified_on: now,
            row_id: self.conn.last_insert_rowid(),
        })
    }

    pub fn find_company(&self, id: CompanyId) -> Result<Option<Company>> {
        let company = self
            .conn
            .prepare_cached(&format!(
                "SELECT {COMPANY_COLUMNS} FROM companies
                 WHERE uuid = ?1"
            ))?
            .query_row(params![id], company_from_row)
            .optional()?;
        Ok(company)
    }

    /// Load a company, failing with `NotFound` when it does not exist.
    pub fn company(&self, id: CompanyId) -> Result<Company> {
        self.find_company(id)?
            .ok_or_else(|| BillingError::not_found("company", id))
    }

    pub fn update_company(&self, company: &Company) -> Result<()> {
        self.conn.execute(
            "UPDATE companies SET name = ?1, description = ?2, modified_on = ?3 WHERE id = ?4",
            params![
                company.name,
                company.description,
                company.modified_on,
                company.row_id
            ],
        )?;
        Ok(())
    }

    // =========================================================================
    // Membership I/O
    // =========================================================================

    pub fn is_member(&self, company: &Company, user: &UserId) -> Result<bool> {
        let found = self
            .conn
            .prepare_cached(
                "SELECT 1 FROM company_members
                 WHERE company_id = ?1 AND user_id = ?2",
            )?
            .exists(params![company.row_id, user.as_str()])?;
        Ok(found)
    }

    /// Add `user` to `company`. Adding an existing member is a no-op.
    pub fn add_member(&self, company: &Company, user: &UserId) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO company_members (company_id, user_id) VALUES (?1, ?2)",
            params![company.row_id, user.as_str()],
        )?;
        Ok(())
    }

    /// Companies `user` belongs to
    pub fn member_companies(&self, user: &UserId) -> Result<Vec<CompanyId>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT c.uuid FROM companies c
             JOIN company_members m ON m.company_id = c.id
             WHERE m.user_id = ?1
             ORDER BY c.name",
        )?;
        let ids = stmt
            .query_map(params![user.as_str()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<CompanyId>>>()?;
        Ok(ids)
    }

    pub fn all_companies(&self) -> Result<Vec<CompanyId>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT uuid FROM companies ORDER BY name")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<CompanyId>>>()?;
        Ok(ids)
    }

    // =========================================================================
    // Item I/O
    // =========================================================================

    pub fn insert_item(&self, item: &Item, company: &Company) -> Result<()> {
        self.conn.execute(
            "INSERT INTO items (uuid, company_id, name, description, price_per_unit, price_max,
                                created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                item.id,
                company.row_id,
                item.name,
                item.description,
                item.price_per_unit,
                item.price_max,
                item.created_on,
                item.modified_on
            ],
        )?;
        debug!(item = %item.id, company = %company.id, "inserted item");
        Ok(())
    }

    pub fn find_item(&self, id: ItemId) -> Result<Option<Item>> {
        let item = self
            .conn
            .prepare_cached(&format!(
                "SELECT {ITEM_COLUMNS} FROM items i JOIN companies c ON c.id = i.company_id
                 WHERE i.uuid = ?1"
            ))?
            .query_row(params![id], item_from_row)
            .optional()?;
        Ok(item)
    }

    pub fn item(&self, id: ItemId) -> Result<Item> {
        self.find_item(id)?
            .ok_or_else(|| BillingError::not_found("item", id))
    }

    pub fn update_item(&self, item: &Item) -> Result<()> {
        self.conn.execute(
            "UPDATE items SET name = ?1, description = ?2, price_per_unit = ?3, price_max = ?4,
                              modified_on = ?5
             WHERE uuid = ?6",
            params![
                item.name,
                item.description,
                item.price_per_unit,
                item.price_max,
                item.modified_on,
                item.id
            ],
        )?;
        Ok(())
    }

    /// Items of one company, newest first
    pub fn list_items(&self, company: &Company) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {ITEM_COLUMNS} FROM items i JOIN companies c ON c.id = i.company_id
             WHERE i.company_id = ?1
             ORDER BY i.created_on DESC, i.id DESC"
        ))?;
        let items = stmt
            .query_map(params![company.row_id], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_rolls_back_on_error() {
        let ctx = BillingContext::open_in_memory().unwrap();
        let result: Result<()> = ctx.write(|db| {
            db.insert_company("Acme", None)?;
            Err(BillingError::conflict("abort"))
        });
        assert!(result.is_err());

        let companies = ctx.read(|db| db.all_companies()).unwrap();
        assert!(companies.is_empty());
    }

    #[test]
    fn test_write_commits_on_ok() {
        let ctx = BillingContext::open_in_memory().unwrap();
        let company = ctx
            .write(|db| db.insert_company("Acme", Some("Tools")))
            .unwrap();
        let loaded = ctx.read(|db| db.company(company.id)).unwrap();
        assert_eq!(loaded.name, "Acme");
        assert_eq!(loaded.description.as_deref(), Some("Tools"));
        assert_eq!(loaded.row_id, company.row_id);
    }

    #[test]
    fn test_membership() {
        let ctx = BillingContext::open_in_memory().unwrap();
        let alice = UserId::from("alice");
        let company = ctx
            .write(|db| {
                let company = db.insert_company("Acme", None)?;
                db.add_member(&company, &alice)?;
                db.add_member(&company, &alice)?;
                Ok(company)
            })
            .unwrap();

        let member = ctx.for_actor(Actor::user("alice"));
        let stranger = ctx.for_actor(Actor::user("mallory"));
        ctx.read(|db| {
            assert!(member.authorize(db, &company).is_ok());
            let err = stranger.authorize(db, &company).unwrap_err();
            assert!(matches!(err, BillingError::Forbidden { .. }));
            assert_eq!(db.member_companies(&alice)?, vec![company.id]);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_file_backed_database_persists() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("kompello.db");
        let id = {
            let ctx = BillingContext::open(&path).unwrap();
            ctx.write(|db| db.insert_company("Acme", None)).unwrap().id
        };
        let config = BillingConfig::in_memory().with_database_path(&path);
        let ctx = BillingContext::from_config(&config).unwrap();
        assert_eq!(ctx.read(|db| db.company(id)).unwrap().name, "Acme");
    }
}
