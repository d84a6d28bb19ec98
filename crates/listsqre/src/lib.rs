//! # Listsqre
//!
//! Cards hold lists of fields. Each card's fields persist one of two ways, and
//! this crate implements both side by side:
//!
//! - **Dynamic tables**: one SQLite table per card, `card_<id>`, mutated one
//!   row at a time. See [`store::tables`].
//! - **Flat files**: one delimited text file per card, loaded whole into an
//!   in-memory [`registry::FieldRegistry`], edited there and rewritten whole.
//!   See [`store::flat_file`], [`codec`] and [`session`].
//!
//! Cards themselves, their items and reminders live in fixed SQLite tables
//! next to the dynamic ones.
//!
//! ## Architecture
//!
//! ```text
//! CLI (listsqre-cli)
//!   └── api::ListsqreApi          cascades, central failure logging
//!         ├── store::cards        cards table
//!         ├── store::items        card_items table (cascades with cards)
//!         ├── store::reminders    reminders table
//!         ├── store::tables       card_<id> tables
//!         └── session             one open flat file
//!               └── store::flat_file + codec + registry
//!                     └── store::backend (fs or memory)
//!
//! dispatch                        async wrappers + observable field list
//! ```
//!
//! ## Identifiers Reach SQL and Paths Only Through Types
//!
//! A table name is built only from a [`model::CardId`]; a file name only from
//! a [`model::CardFileName`]. Both validate on construction, so no raw caller
//! string is ever interpolated into SQL or joined onto a path.
//!
//! ## Errors
//!
//! Every fallible operation returns [`error::Result`]. Absence is a value
//! (`None`, `false`, an empty list); only real failures are errors.

pub mod api;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod init;
pub mod model;
pub mod registry;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod test_utils;
