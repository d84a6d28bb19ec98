//! # Storage Layer
//!
//! A card's fields can be persisted two ways. The two paths share nothing but
//! the [`FieldRecord`](crate::model::FieldRecord) type.
//!
//! ## Dynamic Tables
//!
//! [`tables::TableStore`] keeps one SQLite table per card (`card_<id>`) and
//! mutates rows one statement at a time. Ids come from `AUTOINCREMENT`.
//!
//! ## Flat Files
//!
//! [`flat_file::FlatFileStore`] keeps one delimited text file per card. A file
//! is read whole into a [`FieldRegistry`](crate::registry::FieldRegistry),
//! edited in memory, and rewritten whole on save. The raw I/O sits behind
//! [`backend::TextBackend`] so the logic can run against memory in tests.
//!
//! ## Fixed Tables
//!
//! [`cards::CardStore`], [`items::CardItemStore`] and
//! [`reminders::ReminderStore`] are plain CRUD over the `cards`, `card_items`
//! and `reminders` tables. All share the [`db::Database`] handle with the
//! dynamic tables. Items are tied to their card by a cascading foreign key.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── listsqre.db       # cards, card_items, reminders, card_<id> tables
//! ├── listsqre.toml     # optional configuration
//! └── cards/
//!     └── <slug>-<id>.txt  # one flat file per card
//! ```

pub mod backend;
pub mod cards;
pub mod db;
pub mod flat_file;
pub mod fs_backend;
pub mod items;
pub mod mem_backend;
pub mod reminders;
pub mod tables;
