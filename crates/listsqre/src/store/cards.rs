use super::db::Database;
use crate::error::Result;
use crate::model::{now_millis, Card, CardId};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

const CARD_COLUMNS: &str = "id, title, description, isSelected, isPinned, createdAt";

/// Fixed-schema storage for the cards themselves.
///
/// This is where card ids come from: the `cards` table's autoincrement key is
/// the only source of [`CardId`] values the other stores accept.
pub struct CardStore {
    db: Database,
}

impl CardStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn create_card(&self, title: &str, description: &str) -> Result<Card> {
        let created_at = now_millis();
        let raw = self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cards (title, description, createdAt) VALUES (?1, ?2, ?3)",
                params![title, description, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        let card = Card {
            id: CardId::new(raw)?,
            title: title.to_string(),
            description: description.to_string(),
            is_selected: false,
            is_pinned: false,
            created_at,
        };
        debug!(card = %card.id, "created card");
        Ok(card)
    }

    pub fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM cards WHERE id = ?1", CARD_COLUMNS),
                    params![id.get()],
                    card_from_row,
                )
                .optional()?)
        })
    }

    /// Pinned cards first, newest first within each group.
    pub fn list_cards(&self) -> Result<Vec<Card>> {
        self.query_cards("ORDER BY isPinned DESC, id DESC")
    }

    pub fn selected_cards(&self) -> Result<Vec<Card>> {
        self.query_cards("WHERE isSelected = 1 ORDER BY id")
    }

    /// Writes title, description and both flags. Returns false if the card is
    /// gone.
    pub fn update_card(&self, card: &Card) -> Result<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE cards SET title = ?1, description = ?2, isSelected = ?3, isPinned = ?4
                 WHERE id = ?5",
                params![
                    card.title,
                    card.description,
                    card.is_selected,
                    card.is_pinned,
                    card.id.get()
                ],
            )?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_card(&self, id: CardId) -> Result<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM cards WHERE id = ?1", params![id.get()])?)
        })?;
        Ok(changed > 0)
    }

    pub fn set_card_selected(&self, id: CardId, is_selected: bool) -> Result<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE cards SET isSelected = ?1 WHERE id = ?2",
                params![is_selected, id.get()],
            )?)
        })?;
        Ok(changed > 0)
    }

    /// Removes every selected card and returns them, so their field tables and
    /// files can be cleaned up by the caller. One statement: a card selected
    /// concurrently is either deleted and returned, or left alone.
    pub fn delete_selected_cards(&self) -> Result<Vec<Card>> {
        let mut removed = self.collect_cards(&format!(
            "DELETE FROM cards WHERE isSelected = 1 RETURNING {}",
            CARD_COLUMNS
        ))?;
        // RETURNING has no defined order.
        removed.sort_by_key(|c| c.id);
        Ok(removed)
    }

    pub fn pin_selected_cards(&self) -> Result<usize> {
        self.db.with_conn(|conn| {
            Ok(conn.execute("UPDATE cards SET isPinned = 1 WHERE isSelected = 1", [])?)
        })
    }

    fn query_cards(&self, tail: &str) -> Result<Vec<Card>> {
        self.collect_cards(&format!("SELECT {} FROM cards {}", CARD_COLUMNS, tail))
    }

    fn collect_cards(&self, sql: &str) -> Result<Vec<Card>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], card_from_row)?;
            let mut cards = Vec::new();
            for row in rows {
                cards.push(row?);
            }
            Ok(cards)
        })
    }
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    let raw: i64 = row.get(0)?;
    let id = CardId::new(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))?;
    Ok(Card {
        id,
        title: row.get(1)?,
        description: row.get(2)?,
        is_selected: row.get(3)?,
        is_pinned: row.get(4)?,
        created_at: row.get(5)?,
    })
}
