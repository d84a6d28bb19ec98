use crate::error::{Result, StoreError};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// The single SQLite database behind the card, item, reminder and per-card
/// field tables.
///
/// Foreign keys are enforced, so deleting a card removes its `card_items`
/// rows.
///
/// Statements are serialized through one mutex. Each store operation holds the
/// lock for one statement (or one read), never across operations.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened database");
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::init_with_connection(Connection::open_in_memory()?)
    }

    fn init_with_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS cards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                isSelected INTEGER NOT NULL DEFAULT 0,
                isPinned INTEGER NOT NULL DEFAULT 0,
                createdAt INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS card_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cardId INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                isSelected INTEGER NOT NULL DEFAULT 0,
                isPinned INTEGER NOT NULL DEFAULT 0,
                createdAt INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS index_card_items_cardId ON card_items (cardId);

            CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                uniqueId INTEGER NOT NULL UNIQUE,
                description TEXT NOT NULL,
                notifyAt INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Dispatch("database lock poisoned".to_string()))?;
        f(&conn)
    }

    /// True if a table with this exact name exists.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        self.with_conn(|conn| table_exists(conn, name))
    }
}

pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
