//! # Domain Model: Cards, Fields and the Names Built From Them
//!
//! This module defines the records every store works with: [`FieldRecord`],
//! [`Card`], [`CardItem`] and [`Reminder`], plus the two identifier types that
//! are allowed to end up inside SQL text or a file-system path.
//!
//! ## Why Identifiers Are Types
//!
//! A card's fields live in a table named after the card (`card_7`) or in a file
//! named after its title and id (`groceries-7.txt`). Table names cannot be bound as
//! statement parameters, and file names are paths, so whatever builds them is
//! interpolated verbatim. Both are therefore only constructible through
//! validation:
//!
//! - [`CardId`]: a strictly positive integer. `card_{id}` can never contain
//!   anything but digits after the prefix.
//! - [`CardFileName`]: a slug of the card title. Only ASCII alphanumerics, `-`
//!   and `_` survive; everything else collapses into a single `-`. The slug is
//!   at most `MAX_FILE_STEM` bytes.
//!
//! Card titles are not unique, so a card's own file is named
//! `<slug>-<card id>` ([`Card::file_name`]). Two cards titled "Groceries" and
//! "groceries!" get `groceries-1` and `groceries-2`, never one shared file.
//!
//! ## Field Ids
//!
//! [`FieldId`] means different things per store:
//!
//! | Store | Assignment | After delete |
//! |-------|------------|--------------|
//! | Dynamic table | SQLite `AUTOINCREMENT` | gaps, never reused |
//! | Flat file registry | position in the working set | renumbered `0..n-1` |
//!
//! ## Timestamps
//!
//! `created_at` is epoch milliseconds, set once when the record is built and
//! never touched by an update.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StoreError};

/// Row id inside a card table, or position inside a flat-file registry.
pub type FieldId = i64;

const TABLE_PREFIX: &str = "card_";
const MAX_FILE_STEM: usize = 96;

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CardId(i64);

impl CardId {
    pub fn new(raw: i64) -> Result<Self> {
        if raw <= 0 {
            return Err(StoreError::InvalidCardId(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Name of the physical table holding this card's fields.
    pub fn table_name(self) -> String {
        format!("{}{}", TABLE_PREFIX, self.0)
    }

    /// Inverse of [`CardId::table_name`]; `None` for any other table.
    pub fn from_table_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix(TABLE_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().and_then(|raw| Self::new(raw).ok())
    }
}

impl TryFrom<i64> for CardId {
    type Error = StoreError;

    fn try_from(raw: i64) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<CardId> for i64 {
    fn from(id: CardId) -> i64 {
        id.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn slugify(title: &str) -> Result<String> {
    let mut slug = String::with_capacity(title.len().min(MAX_FILE_STEM));
    let mut pending_dash = false;

    for c in title.trim().chars() {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            pending_dash = true;
            continue;
        }
        let dash = pending_dash && !slug.is_empty();
        if slug.len() + usize::from(dash) + 1 > MAX_FILE_STEM {
            break;
        }
        if dash {
            slug.push('-');
        }
        pending_dash = false;
        slug.push(c.to_ascii_lowercase());
    }

    if slug.is_empty() {
        return Err(StoreError::InvalidFileName(title.to_string()));
    }
    Ok(slug)
}

/// File stem for a card's flat file, derived from its title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CardFileName(String);

impl CardFileName {
    /// Bare slug of `title`. Store-level callers that manage their own names
    /// use this; cards go through [`CardFileName::for_card`].
    pub fn from_title(title: &str) -> Result<Self> {
        Ok(Self(slugify(title)?))
    }

    /// `<slug>-<id>`: unique per card even when titles collide.
    pub fn for_card(id: CardId, title: &str) -> Result<Self> {
        Ok(Self(format!("{}-{}", slugify(title)?, id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub id: FieldId,
    pub title: String,
    pub description: String,
    pub is_selected: bool,
    pub is_pinned: bool,
    pub created_at: i64,
}

impl FieldRecord {
    /// A fresh, unsaved record. The id is assigned by whichever store takes it.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            is_selected: false,
            is_pinned: false,
            created_at: now_millis(),
        }
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub description: String,
    pub is_selected: bool,
    pub is_pinned: bool,
    pub created_at: i64,
}

impl Card {
    pub fn file_name(&self) -> Result<CardFileName> {
        CardFileName::for_card(self.id, &self.title)
    }
}

/// One line of a card kept in the shared `card_items` table. Unlike fields,
/// items have no title and belong to their card through a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardItem {
    pub id: i64,
    pub card_id: CardId,
    pub description: String,
    pub is_selected: bool,
    pub is_pinned: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: i64,
    pub unique_id: i64,
    pub description: String,
    pub notify_at: i64,
}

impl Reminder {
    pub fn is_upcoming(&self, now: i64) -> bool {
        self.notify_at > now
    }
}

/// Orders fields for display: pinned first, then by id.
pub fn sort_for_display(fields: &mut [FieldRecord]) {
    fields.sort_by(|a, b| b.is_pinned.cmp(&a.is_pinned).then(a.id.cmp(&b.id)));
}
