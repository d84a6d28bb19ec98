//! # Card Items: One Shared Table
//!
//! The fixed-schema counterpart of the per-card field tables. Every card's
//! items sit in `card_items`, tied to `cards(id)` by a foreign key with
//! `ON DELETE CASCADE`: deleting a card deletes its items with no extra call.
//!
//! Bulk operations are scoped by card as well as by id, so an id belonging to
//! another card is never touched.

use super::db::Database;
use crate::error::{Result, StoreError};
use crate::model::{now_millis, CardId, CardItem};
use rusqlite::{params, params_from_iter, ErrorCode, Row};
use std::iter;
use tracing::debug;

const ITEM_COLUMNS: &str = "id, cardId, description, isSelected, isPinned, createdAt";

pub struct CardItemStore {
    db: Database,
}

impl CardItemStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Adds an item to `card`. Fails with `CardNotFound` if the card is gone.
    pub fn insert_item(&self, card: CardId, description: &str, is_pinned: bool) -> Result<CardItem> {
        let created_at = now_millis();
        let id = self
            .db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO card_items (cardId, description, isPinned, createdAt)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![card.get(), description, is_pinned, created_at],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .map_err(|e| missing_card(e, card))?;
        debug!(card = %card, item = id, "inserted item");
        Ok(CardItem {
            id,
            card_id: card,
            description: description.to_string(),
            is_selected: false,
            is_pinned,
            created_at,
        })
    }

    /// Pinned first, then oldest first.
    pub fn items_for_card(&self, card: CardId) -> Result<Vec<CardItem>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM card_items WHERE cardId = ?1 ORDER BY isPinned DESC, id ASC",
                ITEM_COLUMNS
            ))?;
            let rows = stmt.query_map(params![card.get()], item_from_row)?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
    }

    /// Writes description and both flags. Returns false if the item is gone.
    pub fn update_item(&self, item: &CardItem) -> Result<bool> {
        let changed = self.db.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE card_items SET description = ?1, isSelected = ?2, isPinned = ?3
                 WHERE id = ?4 AND cardId = ?5",
                params![
                    item.description,
                    item.is_selected,
                    item.is_pinned,
                    item.id,
                    item.card_id.get()
                ],
            )?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_item(&self, card: CardId, id: i64) -> Result<bool> {
        self.delete_items_by_ids(card, &[id]).map(|n| n > 0)
    }

    /// Deletes the listed items of `card`. Returns how many rows went.
    pub fn delete_items_by_ids(&self, card: CardId, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "DELETE FROM card_items WHERE cardId = ? AND id IN ({})",
            placeholders(ids.len())
        );
        self.execute_scoped(&sql, card, ids)
    }

    /// Sets the pin flag on the listed items of `card`.
    pub fn set_pinned_for_items(&self, card: CardId, ids: &[i64], pin: bool) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "UPDATE card_items SET isPinned = {} WHERE cardId = ? AND id IN ({})",
            i32::from(pin),
            placeholders(ids.len())
        );
        self.execute_scoped(&sql, card, ids)
    }

    fn execute_scoped(&self, sql: &str, card: CardId, ids: &[i64]) -> Result<usize> {
        let values = iter::once(card.get()).chain(ids.iter().copied());
        self.db
            .with_conn(|conn| Ok(conn.execute(sql, params_from_iter(values))?))
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// A foreign-key violation on insert means the card does not exist.
fn missing_card(err: StoreError, card: CardId) -> StoreError {
    match &err {
        StoreError::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::CardNotFound(card)
        }
        _ => err,
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<CardItem> {
    let raw: i64 = row.get(1)?;
    let card_id = CardId::new(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Integer, Box::new(e))
    })?;
    Ok(CardItem {
        id: row.get(0)?,
        card_id,
        description: row.get(2)?,
        is_selected: row.get(3)?,
        is_pinned: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::cards::CardStore;

    fn setup() -> (CardStore, CardItemStore) {
        let db = Database::open_in_memory().unwrap();
        (CardStore::new(db.clone()), CardItemStore::new(db))
    }

    fn descriptions(items: &[CardItem]) -> Vec<&str> {
        items.iter().map(|i| i.description.as_str()).collect()
    }

    #[test]
    fn items_are_listed_pinned_first_then_by_id() {
        let (cards, items) = setup();
        let card = cards.create_card("Groceries", "").unwrap();
        items.insert_item(card.id, "milk", false).unwrap();
        items.insert_item(card.id, "eggs", true).unwrap();
        items.insert_item(card.id, "bread", false).unwrap();

        let listed = items.items_for_card(card.id).unwrap();
        assert_eq!(descriptions(&listed), vec!["eggs", "milk", "bread"]);
        assert!(listed.iter().all(|i| i.card_id == card.id));
    }

    #[test]
    fn insert_for_missing_card_is_card_not_found() {
        let (_, items) = setup();
        let ghost = CardId::new(9).unwrap();
        let err = items.insert_item(ghost, "x", false).unwrap_err();
        assert!(matches!(err, StoreError::CardNotFound(id) if id == ghost));
    }

    #[test]
    fn update_and_delete_report_absence() {
        let (cards, items) = setup();
        let card = cards.create_card("c", "").unwrap();
        let mut item = items.insert_item(card.id, "old", false).unwrap();

        item.description = "new".to_string();
        item.is_selected = true;
        assert!(items.update_item(&item).unwrap());
        let stored = &items.items_for_card(card.id).unwrap()[0];
        assert_eq!(stored.description, "new");
        assert!(stored.is_selected);

        assert!(items.delete_item(card.id, item.id).unwrap());
        assert!(!items.delete_item(card.id, item.id).unwrap());
        assert!(!items.update_item(&item).unwrap());
    }

    #[test]
    fn bulk_operations_stay_within_the_card() {
        let (cards, items) = setup();
        let a = cards.create_card("a", "").unwrap();
        let b = cards.create_card("b", "").unwrap();
        let a1 = items.insert_item(a.id, "a1", false).unwrap();
        let a2 = items.insert_item(a.id, "a2", false).unwrap();
        let b1 = items.insert_item(b.id, "b1", false).unwrap();

        assert_eq!(
            items
                .set_pinned_for_items(a.id, &[a2.id, b1.id], true)
                .unwrap(),
            1
        );
        assert_eq!(
            descriptions(&items.items_for_card(a.id).unwrap()),
            vec!["a2", "a1"]
        );

        assert_eq!(
            items
                .delete_items_by_ids(a.id, &[a1.id, a2.id, b1.id])
                .unwrap(),
            2
        );
        assert!(items.items_for_card(a.id).unwrap().is_empty());
        assert_eq!(items.items_for_card(b.id).unwrap().len(), 1);
        assert_eq!(items.delete_items_by_ids(b.id, &[]).unwrap(), 0);
    }

    #[test]
    fn deleting_a_card_cascades_to_its_items() {
        let (cards, items) = setup();
        let a = cards.create_card("a", "").unwrap();
        let b = cards.create_card("b", "").unwrap();
        items.insert_item(a.id, "gone", false).unwrap();
        items.insert_item(b.id, "kept", false).unwrap();

        cards.delete_card(a.id).unwrap();
        assert!(items.items_for_card(a.id).unwrap().is_empty());

        cards.set_card_selected(b.id, true).unwrap();
        cards.delete_selected_cards().unwrap();
        assert!(items.items_for_card(b.id).unwrap().is_empty());
    }
}
