//! # Dynamic Tables: One Table Per Card
//!
//! Each card's fields live in their own table, `card_<id>`. A card's whole
//! field set can then be dropped in one statement, and no query ever needs a
//! `WHERE cardId = ?` filter.
//!
//! ## Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS "card_<id>" (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     isSelected INTEGER DEFAULT 0,
//!     isPinned INTEGER DEFAULT 0,
//!     createdAt INTEGER DEFAULT (<now in ms>)
//! )
//! ```
//!
//! `AUTOINCREMENT` means ids are never reused: deleting a field leaves a gap.
//!
//! ## Identifiers
//!
//! The table name is the one piece of SQL text that cannot be a bound
//! parameter. It is built only from a [`CardId`], which is a validated positive
//! integer, and quoted. Every value (title, description, flags, ids) is bound.
//!
//! ## Not Found vs Failure
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Table missing, reading all fields | `Ok(vec![])` |
//! | Table missing, reading one field | `Ok(None)` |
//! | Table missing, writing | `Err(StoreError::TableMissing)` |
//! | Field id absent, update/delete/toggle | `Ok(false)` |
//! | Anything else SQLite rejects | `Err(StoreError::Database)` |
//!
//! Toggles are a single `CASE` update, so there is no read-then-write window.

use super::db::Database;
use crate::error::{Result, StoreError};
use crate::model::{CardId, FieldId, FieldRecord};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;

const FIELD_COLUMNS: &str = "id, title, description, isSelected, isPinned, createdAt";

pub struct TableStore {
    db: Database,
}

impl TableStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create_card_table(&self, card: CardId) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                isSelected INTEGER DEFAULT 0,
                isPinned INTEGER DEFAULT 0,
                createdAt INTEGER DEFAULT (CAST(strftime('%s','now') AS INTEGER) * 1000)
            )",
            quoted(card)
        );
        self.db.with_conn(|conn| {
            conn.execute_batch(&sql)?;
            Ok(())
        })?;
        debug!(%card, "created field table");
        Ok(())
    }

    pub fn drop_card_table(&self, card: CardId) -> Result<()> {
        let sql = format!("DROP TABLE IF EXISTS {}", quoted(card));
        self.db.with_conn(|conn| {
            conn.execute_batch(&sql)?;
            Ok(())
        })?;
        debug!(%card, "dropped field table");
        Ok(())
    }

    pub fn table_exists(&self, card: CardId) -> Result<bool> {
        self.db.table_exists(&card.table_name())
    }

    /// Every card that currently has a field table.
    pub fn list_card_tables(&self) -> Result<Vec<CardId>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'card\\_%' ESCAPE '\\'",
            )?;
            let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

            let mut cards = Vec::new();
            for name in names {
                if let Some(card) = CardId::from_table_name(&name?) {
                    cards.push(card);
                }
            }
            cards.sort();
            Ok(cards)
        })
    }

    /// Inserts `record` (its id is ignored) and returns the new row id.
    pub fn insert_field(&self, card: CardId, record: &FieldRecord) -> Result<FieldId> {
        let sql = format!(
            "INSERT INTO {} (title, description, isSelected, isPinned, createdAt)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            quoted(card)
        );
        self.db
            .with_conn(|conn| {
                conn.execute(
                    &sql,
                    params![
                        record.title,
                        record.description,
                        record.is_selected,
                        record.is_pinned,
                        record.created_at,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .map_err(|e| missing_table(card, e))
    }

    /// Writes title, description and both flags of `record.id`. `createdAt` is
    /// never rewritten. Returns false if no such row exists.
    pub fn update_field(&self, card: CardId, record: &FieldRecord) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET title = ?1, description = ?2, isSelected = ?3, isPinned = ?4
             WHERE id = ?5",
            quoted(card)
        );
        self.execute(
            card,
            &sql,
            params![
                record.title,
                record.description,
                record.is_selected,
                record.is_pinned,
                record.id,
            ],
        )
        .map(|changed| changed > 0)
    }

    pub fn delete_field(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", quoted(card));
        self.execute(card, &sql, params![field_id])
            .map(|changed| changed > 0)
    }

    /// All fields ordered by id. A card without a table has no fields.
    pub fn get_all_fields(&self, card: CardId) -> Result<Vec<FieldRecord>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", FIELD_COLUMNS, quoted(card));
        let result = self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], field_from_row)?;
            let mut fields = Vec::new();
            for row in rows {
                fields.push(row?);
            }
            Ok(fields)
        });
        match result.map_err(|e| missing_table(card, e)) {
            Err(StoreError::TableMissing(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    pub fn get_field_by_id(&self, card: CardId, field_id: FieldId) -> Result<Option<FieldRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            FIELD_COLUMNS,
            quoted(card)
        );
        let result = self.db.with_conn(|conn| {
            Ok(conn
                .query_row(&sql, params![field_id], field_from_row)
                .optional()?)
        });
        match result.map_err(|e| missing_table(card, e)) {
            Err(StoreError::TableMissing(_)) => Ok(None),
            other => other,
        }
    }

    pub fn toggle_field_selection(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        self.toggle(card, "isSelected", field_id)
    }

    pub fn toggle_field_pin(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        self.toggle(card, "isPinned", field_id)
    }

    /// Deletes every selected field in one statement. Returns how many went.
    pub fn delete_selected_fields(&self, card: CardId) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE isSelected = 1", quoted(card));
        self.execute(card, &sql, [])
    }

    /// Clears the selection flag on every field.
    pub fn clear_selection(&self, card: CardId) -> Result<usize> {
        let sql = format!(
            "UPDATE {} SET isSelected = 0 WHERE isSelected = 1",
            quoted(card)
        );
        self.execute(card, &sql, [])
    }

    /// Sets the pin flag on a batch of fields. Returns how many rows matched.
    pub fn set_pinned_for_fields(&self, card: CardId, ids: &[FieldId], pin: bool) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE {} SET isPinned = {} WHERE id IN ({})",
            quoted(card),
            i32::from(pin),
            placeholders
        );
        self.execute(card, &sql, params_from_iter(ids.iter()))
    }

    fn toggle(&self, card: CardId, column: &'static str, field_id: FieldId) -> Result<bool> {
        let sql = format!(
            "UPDATE {table} SET {column} = CASE WHEN {column} = 1 THEN 0 ELSE 1 END WHERE id = ?1",
            table = quoted(card),
        );
        self.execute(card, &sql, params![field_id])
            .map(|changed| changed > 0)
    }

    fn execute(&self, card: CardId, sql: &str, params: impl rusqlite::Params) -> Result<usize> {
        self.db
            .with_conn(|conn| Ok(conn.execute(sql, params)?))
            .map_err(|e| missing_table(card, e))
    }
}

fn quoted(card: CardId) -> String {
    format!("\"{}\"", card.table_name())
}

fn field_from_row(row: &Row<'_>) -> rusqlite::Result<FieldRecord> {
    Ok(FieldRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        is_selected: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
        is_pinned: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        created_at: row.get::<_, Option<i64>>(5)?.unwrap_or_default(),
    })
}

/// SQLite reports a missing table only through the message text.
fn missing_table(card: CardId, err: StoreError) -> StoreError {
    if let StoreError::Database(rusqlite::Error::SqliteFailure(_, Some(msg))) = &err {
        if msg.starts_with("no such table") {
            return StoreError::TableMissing(card);
        }
    }
    err
}
