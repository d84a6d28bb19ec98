//! # Off-Thread Dispatch
//!
//! SQLite calls block. Async callers reach the stores through these wrappers,
//! which move each call onto tokio's blocking pool with
//! [`tokio::task::spawn_blocking`] and hand back a future of the same
//! [`Result`].
//!
//! - There is no cancellation. Dropping the future does not stop a statement
//!   that has already started.
//! - A panicked or aborted task surfaces as [`StoreError::Dispatch`].
//!
//! [`FieldsModel`] sits on top for UI-style consumers: it owns a
//! [`watch`] channel carrying the current field list of one card and refreshes
//! it after every mutation it performs.
//!
//! [`StoreError::Dispatch`]: crate::error::StoreError::Dispatch

use crate::error::Result;
use crate::model::{sort_for_display, Card, CardId, FieldId, FieldRecord};
use crate::store::cards::CardStore;
use crate::store::tables::TableStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

async fn run_blocking<S, T, F>(store: &Arc<S>, f: F) -> Result<T>
where
    S: Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(store.as_ref())).await?
}

/// Async face of [`TableStore`].
#[derive(Clone)]
pub struct AsyncTables {
    store: Arc<TableStore>,
}

impl AsyncTables {
    pub fn new(store: TableStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub async fn create_card_table(&self, card: CardId) -> Result<()> {
        run_blocking(&self.store, move |s| s.create_card_table(card)).await
    }

    pub async fn drop_card_table(&self, card: CardId) -> Result<()> {
        run_blocking(&self.store, move |s| s.drop_card_table(card)).await
    }

    pub async fn insert_field(&self, card: CardId, record: FieldRecord) -> Result<FieldId> {
        run_blocking(&self.store, move |s| s.insert_field(card, &record)).await
    }

    pub async fn update_field(&self, card: CardId, record: FieldRecord) -> Result<bool> {
        run_blocking(&self.store, move |s| s.update_field(card, &record)).await
    }

    pub async fn delete_field(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        run_blocking(&self.store, move |s| s.delete_field(card, field_id)).await
    }

    pub async fn get_all_fields(&self, card: CardId) -> Result<Vec<FieldRecord>> {
        run_blocking(&self.store, move |s| s.get_all_fields(card)).await
    }

    pub async fn get_field_by_id(
        &self,
        card: CardId,
        field_id: FieldId,
    ) -> Result<Option<FieldRecord>> {
        run_blocking(&self.store, move |s| s.get_field_by_id(card, field_id)).await
    }

    pub async fn toggle_field_selection(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        run_blocking(&self.store, move |s| s.toggle_field_selection(card, field_id)).await
    }

    pub async fn toggle_field_pin(&self, card: CardId, field_id: FieldId) -> Result<bool> {
        run_blocking(&self.store, move |s| s.toggle_field_pin(card, field_id)).await
    }

    pub async fn delete_selected_fields(&self, card: CardId) -> Result<usize> {
        run_blocking(&self.store, move |s| s.delete_selected_fields(card)).await
    }

    pub async fn clear_selection(&self, card: CardId) -> Result<usize> {
        run_blocking(&self.store, move |s| s.clear_selection(card)).await
    }

    pub async fn set_pinned_for_fields(
        &self,
        card: CardId,
        ids: Vec<FieldId>,
        pin: bool,
    ) -> Result<usize> {
        run_blocking(&self.store, move |s| s.set_pinned_for_fields(card, &ids, pin)).await
    }

    pub async fn table_exists(&self, card: CardId) -> Result<bool> {
        run_blocking(&self.store, move |s| s.table_exists(card)).await
    }

    pub async fn list_card_tables(&self) -> Result<Vec<CardId>> {
        run_blocking(&self.store, |s| s.list_card_tables()).await
    }
}

/// Async face of [`CardStore`].
#[derive(Clone)]
pub struct AsyncCards {
    store: Arc<CardStore>,
}

impl AsyncCards {
    pub fn new(store: CardStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub async fn create_card(&self, title: String, description: String) -> Result<Card> {
        run_blocking(&self.store, move |s| s.create_card(&title, &description)).await
    }

    pub async fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        run_blocking(&self.store, move |s| s.get_card(id)).await
    }

    pub async fn list_cards(&self) -> Result<Vec<Card>> {
        run_blocking(&self.store, |s| s.list_cards()).await
    }

    pub async fn update_card(&self, card: Card) -> Result<bool> {
        run_blocking(&self.store, move |s| s.update_card(&card)).await
    }

    pub async fn delete_card(&self, id: CardId) -> Result<bool> {
        run_blocking(&self.store, move |s| s.delete_card(id)).await
    }

    pub async fn set_card_selected(&self, id: CardId, is_selected: bool) -> Result<bool> {
        run_blocking(&self.store, move |s| s.set_card_selected(id, is_selected)).await
    }

    pub async fn delete_selected_cards(&self) -> Result<Vec<Card>> {
        run_blocking(&self.store, |s| s.delete_selected_cards()).await
    }

    pub async fn pin_selected_cards(&self) -> Result<usize> {
        run_blocking(&self.store, |s| s.pin_selected_cards()).await
    }
}

/// What a field list view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldsState {
    pub loading: bool,
    /// Pinned first, then by id.
    pub fields: Vec<FieldRecord>,
}

/// Observable field list of one card.
pub struct FieldsModel {
    tables: AsyncTables,
    card: CardId,
    state: watch::Sender<FieldsState>,
}

impl FieldsModel {
    pub fn new(tables: AsyncTables, card: CardId) -> Self {
        let (state, _) = watch::channel(FieldsState::default());
        Self {
            tables,
            card,
            state,
        }
    }

    pub fn card(&self) -> CardId {
        self.card
    }

    pub fn subscribe(&self) -> watch::Receiver<FieldsState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> FieldsState {
        self.state.borrow().clone()
    }

    /// Ensures the card's table exists and publishes its fields.
    pub async fn load(&self) -> Result<()> {
        self.tables.create_card_table(self.card).await?;
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<()> {
        self.state.send_modify(|s| s.loading = true);
        match self.tables.get_all_fields(self.card).await {
            Ok(mut fields) => {
                sort_for_display(&mut fields);
                debug!(card = %self.card, count = fields.len(), "refreshed fields");
                self.state.send_replace(FieldsState {
                    loading: false,
                    fields,
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| s.loading = false);
                Err(e)
            }
        }
    }

    pub async fn add_field(&self, title: &str, description: &str) -> Result<FieldId> {
        let id = self
            .tables
            .insert_field(self.card, FieldRecord::new(title, description))
            .await?;
        self.refresh().await?;
        Ok(id)
    }

    pub async fn update_field(&self, record: FieldRecord) -> Result<bool> {
        let changed = self.tables.update_field(self.card, record).await?;
        self.refresh().await?;
        Ok(changed)
    }

    pub async fn delete_field(&self, field_id: FieldId) -> Result<bool> {
        let changed = self.tables.delete_field(self.card, field_id).await?;
        self.refresh().await?;
        Ok(changed)
    }

    pub async fn toggle_pin(&self, field_id: FieldId) -> Result<bool> {
        let changed = self.tables.toggle_field_pin(self.card, field_id).await?;
        self.refresh().await?;
        Ok(changed)
    }

    pub async fn toggle_selection(&self, field_id: FieldId) -> Result<bool> {
        let changed = self
            .tables
            .toggle_field_selection(self.card, field_id)
            .await?;
        self.refresh().await?;
        Ok(changed)
    }

    pub async fn delete_selected(&self) -> Result<usize> {
        let removed = self.tables.delete_selected_fields(self.card).await?;
        self.refresh().await?;
        Ok(removed)
    }
}
