//! SQLite store: one row per item in the `todos` table.
//!
//! Uniqueness of titles is enforced by the schema, ids come from the
//! `AUTOINCREMENT` primary key (never recycled, never regressing), and every
//! mutation is a single statement. A connection is opened per operation and
//! released before returning.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rusqlite::{Connection, Row, Transaction, params};

use super::traits::RecordStore;
use crate::domain::{Item, ItemId};
use crate::error::{Result, TodoError};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        done INTEGER NOT NULL DEFAULT 0
    );
"#;

/// Relational store backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            db_path: path.as_ref().to_path_buf(),
        };
        store.connect()?;
        info!("Opened SQLite store at {}", store.db_path.display());
        Ok(store)
    }

    /// Open a connection for one unit of work.
    fn connect(&self) -> Result<Connection> {
        let db = Connection::open(&self.db_path)
            .map_err(|e| TodoError::StorageUnavailable(format!("{}: {}", self.db_path.display(), e)))?;
        db.execute_batch(SCHEMA)?;
        Ok(db)
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
        Ok(Item {
            id: row.get(0)?,
            title: row.get(1)?,
            done: row.get(2)?,
        })
    }

    fn query_items(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Item>> {
        let db = self.connect()?;
        let mut stmt = db.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    fn insert_all(tx: &Transaction<'_>, titles: &[String]) -> rusqlite::Result<Vec<Item>> {
        let mut stmt = tx.prepare("INSERT INTO todos(title) VALUES (?1)")?;
        let mut items = Vec::with_capacity(titles.len());
        for title in titles {
            stmt.execute([title])?;
            items.push(Item::new(tx.last_insert_rowid(), title.as_str()));
        }
        Ok(items)
    }
}

/// True when `err` is a UNIQUE constraint violation.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Translate a write error, singling out duplicate titles.
fn translate_write_error(err: rusqlite::Error, title: &str) -> TodoError {
    if is_unique_violation(&err) {
        TodoError::DuplicateTitle(title.to_string())
    } else {
        TodoError::Sqlite(err)
    }
}

impl RecordStore for SqliteStore {
    fn location(&self) -> &Path {
        &self.db_path
    }

    fn enforces_unique_titles(&self) -> bool {
        true
    }

    /// Incomplete items first, then id order.
    fn load(&self) -> Result<Vec<Item>> {
        self.query_items("SELECT id, title, done FROM todos ORDER BY done, id", [])
    }

    fn insert(&self, title: &str) -> Result<Item> {
        let db = self.connect()?;
        db.execute("INSERT INTO todos(title) VALUES (?1)", [title])
            .map_err(|e| translate_write_error(e, title))?;
        let item = Item::new(db.last_insert_rowid(), title);
        info!("Added item {}", item.id);
        Ok(item)
    }

    /// All rows in one transaction; any failure rolls the whole batch back.
    fn insert_batch(&self, titles: &[String]) -> Result<Vec<Item>> {
        let mut db = self.connect()?;
        let tx = db.transaction()?;

        match Self::insert_all(&tx, titles) {
            Ok(items) => {
                tx.commit().map_err(|e| {
                    warn!("Bulk insert commit failed: {}", e);
                    TodoError::BatchFailure(e.to_string())
                })?;
                info!("Committed {} items in one transaction", items.len());
                Ok(items)
            }
            Err(e) => {
                warn!("Bulk insert failed, rolling back: {}", e);
                tx.rollback()?;
                Err(TodoError::BatchFailure(e.to_string()))
            }
        }
    }

    fn update_title(&self, id: ItemId, title: &str) -> Result<bool> {
        let db = self.connect()?;
        let changed = db
            .execute("UPDATE todos SET title = ?1 WHERE id = ?2", params![title, id])
            .map_err(|e| translate_write_error(e, title))?;
        debug!("update_title({}) changed {} rows", id, changed);
        Ok(changed > 0)
    }

    /// Flipped in one statement so no read-modify-write race exists.
    fn toggle_done(&self, id: ItemId) -> Result<bool> {
        let db = self.connect()?;
        let changed = db.execute(
            "UPDATE todos SET done = CASE done WHEN 0 THEN 1 ELSE 0 END WHERE id = ?1",
            [id],
        )?;
        debug!("toggle_done({}) changed {} rows", id, changed);
        Ok(changed > 0)
    }

    fn delete(&self, id: ItemId) -> Result<bool> {
        let db = self.connect()?;
        let changed = db.execute("DELETE FROM todos WHERE id = ?1", [id])?;
        debug!("delete({}) changed {} rows", id, changed);
        Ok(changed > 0)
    }

    /// Case-sensitive substring match via `instr`.
    fn search(&self, needle: &str) -> Result<Vec<Item>> {
        self.query_items(
            "SELECT id, title, done FROM todos WHERE instr(title, ?1) > 0 ORDER BY id",
            [needle],
        )
    }
}
