//! # API Facade
//!
//! [`ListsqreApi`] is the single entry point for every UI. It composes the
//! stores over one [`Database`] plus one [`FlatFileStore`] and adds the few
//! rules that span stores.
//!
//! ## What the API Adds
//!
//! - **Cascading deletes**: removing a card drops its `card_<id>` table and
//!   deletes its flat file. The stores themselves know nothing about each
//!   other.
//! - **Table lifecycle**: creating a card creates its field table.
//! - **Items**: a card's `card_items` rows go with it through the foreign key,
//!   so the cascade needs no item call.
//! - **Central failure logging**: every storage error is logged once here with
//!   `tracing::warn!` and then returned unchanged. Lower layers only log
//!   successful lifecycle events at `debug`.
//!
//! ## What the API Does NOT Do
//!
//! - **Presentation**: it returns records, never strings.
//! - **Swallowing errors**: not-found is `Ok(None)`, `Ok(false)` or an empty
//!   list; anything else is an `Err` the caller sees.
//!
//! ## Generic Over TextBackend
//!
//! `ListsqreApi<B: TextBackend>` is generic over the flat-file backend:
//! - Production: `ListsqreApi<FsBackend>`
//! - Testing: `ListsqreApi<MemBackend>`

use crate::dispatch::{AsyncCards, AsyncTables};
use crate::error::{Result, StoreError};
use crate::model::{
    sort_for_display, Card, CardFileName, CardId, CardItem, FieldId, FieldRecord, Reminder,
};
use crate::session::FlatFileSession;
use crate::store::backend::TextBackend;
use crate::store::cards::CardStore;
use crate::store::db::Database;
use crate::store::flat_file::FlatFileStore;
use crate::store::items::CardItemStore;
use crate::store::reminders::ReminderStore;
use crate::store::tables::TableStore;
use std::path::PathBuf;
use tracing::{debug, warn};

fn logged<T>(op: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        warn!(op, error = %e, "storage operation failed");
    }
    result
}

pub struct ListsqreApi<B: TextBackend> {
    db: Database,
    tables: TableStore,
    cards: CardStore,
    items: CardItemStore,
    reminders: ReminderStore,
    files: FlatFileStore<B>,
}

impl<B: TextBackend> ListsqreApi<B> {
    pub fn new(db: Database, files: FlatFileStore<B>) -> Self {
        Self {
            tables: TableStore::new(db.clone()),
            cards: CardStore::new(db.clone()),
            items: CardItemStore::new(db.clone()),
            reminders: ReminderStore::new(db.clone()),
            db,
            files,
        }
    }

    pub fn files(&self) -> &FlatFileStore<B> {
        &self.files
    }

    /// Async handles sharing this API's database.
    pub fn async_tables(&self) -> AsyncTables {
        AsyncTables::new(TableStore::new(self.db.clone()))
    }

    pub fn async_cards(&self) -> AsyncCards {
        AsyncCards::new(CardStore::new(self.db.clone()))
    }

    // --- cards ---

    pub fn create_card(&self, title: &str, description: &str) -> Result<Card> {
        logged("create_card", self.create_card_inner(title, description))
    }

    fn create_card_inner(&self, title: &str, description: &str) -> Result<Card> {
        let card = self.cards.create_card(title, description)?;
        self.tables.create_card_table(card.id)?;
        Ok(card)
    }

    pub fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        logged("get_card", self.cards.get_card(id))
    }

    /// Like [`get_card`](Self::get_card), but absence is an error.
    pub fn require_card(&self, id: CardId) -> Result<Card> {
        self.get_card(id)?.ok_or(StoreError::CardNotFound(id))
    }

    pub fn list_cards(&self) -> Result<Vec<Card>> {
        logged("list_cards", self.cards.list_cards())
    }

    pub fn update_card(&self, card: &Card) -> Result<bool> {
        logged("update_card", self.cards.update_card(card))
    }

    pub fn set_card_selected(&self, id: CardId, is_selected: bool) -> Result<bool> {
        logged(
            "set_card_selected",
            self.cards.set_card_selected(id, is_selected),
        )
    }

    pub fn pin_selected_cards(&self) -> Result<usize> {
        logged("pin_selected_cards", self.cards.pin_selected_cards())
    }

    /// Deletes the card, its field table and its flat file. Returns false if
    /// the card did not exist.
    pub fn delete_card(&self, id: CardId) -> Result<bool> {
        logged("delete_card", self.delete_card_inner(id))
    }

    fn delete_card_inner(&self, id: CardId) -> Result<bool> {
        let Some(card) = self.cards.get_card(id)? else {
            return Ok(false);
        };
        self.cards.delete_card(id)?;
        self.purge_card_storage(std::slice::from_ref(&card))?;
        Ok(true)
    }

    /// Deletes every selected card with its table and file.
    pub fn delete_selected_cards(&self) -> Result<Vec<Card>> {
        logged("delete_selected_cards", self.delete_selected_cards_inner())
    }

    fn delete_selected_cards_inner(&self) -> Result<Vec<Card>> {
        let removed = self.cards.delete_selected_cards()?;
        self.purge_card_storage(&removed)?;
        Ok(removed)
    }

    fn purge_card_storage(&self, cards: &[Card]) -> Result<()> {
        for card in cards {
            self.tables.drop_card_table(card.id)?;
        }
        // A title with no usable characters never had a file.
        let names: Vec<CardFileName> = cards.iter().filter_map(|c| c.file_name().ok()).collect();
        let deleted = self.files.delete_text_files(&names)?;
        debug!(cards = cards.len(), files = deleted, "purged card storage");
        Ok(())
    }

    // --- fields (dynamic tables) ---

    pub fn add_field(&self, card: CardId, title: &str, description: &str) -> Result<FieldId> {
        logged(
            "add_field",
            self.tables
                .insert_field(card, &FieldRecord::new(title, description)),
        )
    }

    pub fn get_field(&self, card: CardId, field_id: FieldId) -> Result<Option<FieldRecord>> {
        logged("get_field", self.tables.get_field_by_id(card, field_id))
    }

    /// Fields in display order: pinned first, then by id.
    pub fn list_fields(&self, card: CardId) -> Result<Vec<FieldRecord>> {
        let mut fields = logged("list_fields", self.tables.get_all_fields(card))?;
        sort_for_display(&mut fields);
        Ok(fields)
    }

    /// Rewrites title and description, keeping flags. Returns false if the
    /// field does not exist.
    pub fn update_field(
        &self,
        card: CardId,
        field_id: FieldId,
        title: &str,
        description: &str,
    ) -> Result<bool> {
        logged(
            "update_field",
            self.update_field_inner(card, field_id, title, description),
        )
    }

    fn update_field_inner(
        &self,
        card: CardId,
        field_id: FieldId,
        title: &str,
        description: &str,
    ) -> Result<bool> {
        let Some(mut record) = self.tables.get_field_by_id(card, field_id)? else {
            return Ok(false);
        };
        record.title = title.to_string();
        record.description = description.to_string();
        self.tables.update_field(card, &record)
    }

    pub fn delete_field(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        logged("delete_field", self.tables.delete_field(card, field_id))
    }

    pub fn toggle_field_pin(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        logged("toggle_field_pin", self.tables.toggle_field_pin(card, field_id))
    }

    pub fn toggle_field_selection(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        logged(
            "toggle_field_selection",
            self.tables.toggle_field_selection(card, field_id),
        )
    }

    pub fn delete_selected_fields(&self, card: CardId) -> Result<usize> {
        logged(
            "delete_selected_fields",
            self.tables.delete_selected_fields(card),
        )
    }

    // --- items (shared table) ---

    pub fn add_item(&self, card: CardId, description: &str, is_pinned: bool) -> Result<CardItem> {
        logged(
            "add_item",
            self.items.insert_item(card, description, is_pinned),
        )
    }

    /// Pinned first, then oldest first.
    pub fn list_items(&self, card: CardId) -> Result<Vec<CardItem>> {
        logged("list_items", self.items.items_for_card(card))
    }

    pub fn update_item(&self, item: &CardItem) -> Result<bool> {
        logged("update_item", self.items.update_item(item))
    }

    pub fn delete_items(&self, card: CardId, ids: &[i64]) -> Result<usize> {
        logged("delete_items", self.items.delete_items_by_ids(card, ids))
    }

    pub fn set_items_pinned(&self, card: CardId, ids: &[i64], pin: bool) -> Result<usize> {
        logged(
            "set_items_pinned",
            self.items.set_pinned_for_items(card, ids, pin),
        )
    }

    // --- flat files ---

    /// Opens the card's flat file, creating it if needed.
    pub fn open_file(&self, card: &Card) -> Result<FlatFileSession<'_, B>> {
        logged("open_file", self.open_file_inner(card))
    }

    fn open_file_inner(&self, card: &Card) -> Result<FlatFileSession<'_, B>> {
        FlatFileSession::open(&self.files, card.file_name()?)
    }

    pub fn save_file(&self, session: &FlatFileSession<'_, B>) -> Result<bool> {
        logged("save_file", session.save())
    }

    pub fn file_path(&self, card: &Card) -> Result<PathBuf> {
        Ok(self.files.path(&card.file_name()?))
    }

    // --- reminders ---

    pub fn add_reminder(&self, unique_id: i64, description: &str, notify_at: i64) -> Result<Reminder> {
        logged(
            "add_reminder",
            self.reminders
                .insert_reminder(unique_id, description, notify_at),
        )
    }

    pub fn list_reminders(&self) -> Result<Vec<Reminder>> {
        logged("list_reminders", self.reminders.list_reminders())
    }

    pub fn delete_reminder(&self, id: i64) -> Result<bool> {
        logged("delete_reminder", self.reminders.delete_reminder(id))
    }

    pub fn delete_reminder_by_unique_id(&self, unique_id: i64) -> Result<bool> {
        logged(
            "delete_reminder_by_unique_id",
            self.reminders.delete_reminder_by_unique_id(unique_id),
        )
    }
}
