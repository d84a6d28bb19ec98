//! # CLI Behavior
//!
//! This is **one possible UI client** for listsqre, not the application
//! itself. For the overall architecture, see the crate-level documentation.
//!
//! ## Command Groups
//!
//! - `card`: the cards themselves. Deleting a card also drops its field table
//!   and its flat file.
//! - `field`: a card's fields in its SQLite table. Ids come from the table and
//!   never shift.
//! - `file`: a card's fields in its flat file. Indexes are positions and shift
//!   down after a delete; `file list` always shows the current ones.
//! - `reminder`: stored reminders.
//! - `config`: effective configuration, or a sample `listsqre.toml`.
//!
//! Running `listsqre` with no arguments lists cards.
//!
//! ## Module Structure
//!
//! - `commands`: logging setup, context wiring and per-group handlers
//! - `render`: text and JSON output
//! - `setup`: argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
