//! # Flat File Format
//!
//! One card's fields are stored as a sequence of records. Each record is a
//! run of fields separated by the field delimiter and terminated by the record
//! delimiter:
//!
//! ```text
//! <id> F <title> F <description> F <reserved> F <pinned> F R
//! ```
//!
//! - `pinned` is `1` or `0`.
//! - `reserved` (position 3) is written empty and ignored on read. Selection
//!   state is never persisted.
//! - The encoded `id` is ignored on read; the registry assigns a fresh one.
//!
//! The defaults are the ASCII unit separator (`U+001F`) between fields and the
//! record separator (`U+001E`) plus a newline between records, so a file stays
//! readable line by line. Neither is whitespace, so trimming decoded fields
//! never eats a delimiter.
//!
//! Delimiters found inside a title or description are replaced by a space when
//! encoding. Without that, a stray delimiter would split the record on decode.
//!
//! Decoding trims every field, so text survives a save and reload except for
//! leading or trailing whitespace (a title ending in `\n` comes back without
//! it).

use crate::error::{Result, StoreError};
use crate::model::FieldRecord;
use crate::registry::FieldRegistry;

pub const DEFAULT_FIELD_DELIMITER: &str = "\u{1f}";
pub const DEFAULT_RECORD_DELIMITER: &str = "\u{1e}\n";

const TITLE_SLOT: usize = 1;
const DESCRIPTION_SLOT: usize = 2;
const PINNED_SLOT: usize = 4;
const MIN_FIELDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterCodec {
    field: String,
    record: String,
}

impl Default for DelimiterCodec {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD_DELIMITER.to_string(),
            record: DEFAULT_RECORD_DELIMITER.to_string(),
        }
    }
}

impl DelimiterCodec {
    pub fn new(field: impl Into<String>, record: impl Into<String>) -> Result<Self> {
        let field = field.into();
        let record = record.into();

        let separator = record.trim_end_matches(['\n', '\r']);
        if field.trim().is_empty() || separator.trim().is_empty() {
            return Err(StoreError::InvalidDelimiters(
                "delimiters must contain a non-whitespace character".to_string(),
            ));
        }
        if field.contains(separator) || separator.contains(field.as_str()) {
            return Err(StoreError::InvalidDelimiters(format!(
                "field delimiter {:?} and record delimiter {:?} overlap",
                field, record
            )));
        }
        Ok(Self { field, record })
    }

    pub fn field_delimiter(&self) -> &str {
        &self.field
    }

    pub fn record_delimiter(&self) -> &str {
        &self.record
    }

    /// Serializes one record, record delimiter included.
    pub fn encode(&self, record: &FieldRecord) -> String {
        let f = &self.field;
        let pinned = if record.is_pinned { "1" } else { "0" };
        format!(
            "{id}{f}{title}{f}{description}{f}{f}{pinned}{f}{r}",
            id = record.id,
            title = self.scrub(&record.title),
            description = self.scrub(&record.description),
            r = self.record,
        )
    }

    /// Parses a whole file and appends every accepted record to `registry`.
    /// Returns how many records were added.
    pub fn decode_into(&self, text: &str, registry: &mut FieldRegistry) -> usize {
        let mut added = 0;
        for chunk in self.split_records(text) {
            if let Some((title, description, pinned)) = self.decode_chunk(chunk) {
                registry.add_item(title, description, pinned);
                added += 1;
            }
        }
        added
    }

    /// The record delimiter without its trailing line break. Splitting on this
    /// keeps hand-edited files that lost the newline readable.
    fn separator(&self) -> &str {
        self.record.trim_end_matches(['\n', '\r'])
    }

    fn split_records<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split(self.separator())
            .filter(|chunk| !chunk.trim().is_empty())
    }

    fn decode_chunk(&self, chunk: &str) -> Option<(String, String, bool)> {
        let fields: Vec<&str> = chunk.split(self.field.as_str()).map(str::trim).collect();
        if fields.len() < MIN_FIELDS {
            return None;
        }
        let title = fields.get(TITLE_SLOT).copied().unwrap_or_default();
        let description = fields.get(DESCRIPTION_SLOT).copied().unwrap_or_default();
        let pinned = fields
            .get(PINNED_SLOT)
            .is_some_and(|v| *v == "1" || v.eq_ignore_ascii_case("true"));
        Some((title.to_string(), description.to_string(), pinned))
    }

    fn scrub(&self, text: &str) -> String {
        text.replace(self.field.as_str(), " ")
            .replace(self.separator(), " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, description: &str, pinned: bool) -> FieldRecord {
        FieldRecord {
            id,
            ..FieldRecord::new(title, description).pinned(pinned)
        }
    }

    #[test]
    fn encode_layout() {
        let codec = DelimiterCodec::new("|", "#").unwrap();
        assert_eq!(codec.encode(&record(3, "Milk", "2L", true)), "3|Milk|2L||1|#");
        assert_eq!(codec.encode(&record(0, "Eggs", "", false)), "0|Eggs|||0|#");
    }

    #[test]
    fn decode_reads_title_description_and_pinned_slot() {
        let codec = DelimiterCodec::new("|", "#").unwrap();
        let mut registry = FieldRegistry::new();
        let added = codec.decode_into("9|Milk|2L||1|#4|Eggs|dozen||0|#", &mut registry);

        assert_eq!(added, 2);
        let items = registry.items();
        assert_eq!(items[0].id, 0);
        assert_eq!(items[0].title, "Milk");
        assert_eq!(items[0].description, "2L");
        assert!(items[0].is_pinned);
        assert_eq!(items[1].id, 1);
        assert!(!items[1].is_pinned);
    }

    #[test]
    fn decode_skips_short_and_blank_chunks() {
        let codec = DelimiterCodec::new("|", "#").unwrap();
        let mut registry = FieldRegistry::new();
        let added = codec.decode_into("  #only|two#\n#0|Bread|rye#", &mut registry);

        assert_eq!(added, 1);
        assert_eq!(registry.items()[0].title, "Bread");
        assert!(!registry.items()[0].is_pinned);
    }

    #[test]
    fn decode_trims_fields() {
        let codec = DelimiterCodec::new("|", "#").unwrap();
        let mut registry = FieldRegistry::new();
        codec.decode_into(" 0 | Milk |  semi skimmed | | 1 |#", &mut registry);

        let item = &registry.items()[0];
        assert_eq!(item.title, "Milk");
        assert_eq!(item.description, "semi skimmed");
        assert!(item.is_pinned);
    }

    #[test]
    fn decode_accepts_legacy_true_flag() {
        let codec = DelimiterCodec::new("|", "#").unwrap();
        let mut registry = FieldRegistry::new();
        codec.decode_into("0|A|B||true|#", &mut registry);
        assert!(registry.items()[0].is_pinned);
    }

    #[test]
    fn pinned_in_slot_three_is_not_read() {
        // Slot 3 is reserved; a four-field record carries no pin state.
        let codec = DelimiterCodec::new("|", "#").unwrap();
        let mut registry = FieldRegistry::new();
        codec.decode_into("0|A|B|1#", &mut registry);
        assert!(!registry.items()[0].is_pinned);
    }

    #[test]
    fn surrounding_whitespace_is_not_preserved() {
        let codec = DelimiterCodec::default();
        let encoded = codec.encode(&record(0, "Milk\n", "  2L ", false));

        let mut registry = FieldRegistry::new();
        codec.decode_into(&encoded, &mut registry);
        assert_eq!(registry.items()[0].title, "Milk");
        assert_eq!(registry.items()[0].description, "2L");
    }

    #[test]
    fn default_codec_round_trips_through_registry() {
        let codec = DelimiterCodec::default();
        let text: String = [
            record(0, "A", "B", true),
            record(1, "multi word", "with, commas; and | pipes", false),
        ]
        .iter()
        .map(|r| codec.encode(r))
        .collect();

        assert_eq!(text.lines().count(), 2);

        let mut registry = FieldRegistry::new();
        assert_eq!(codec.decode_into(&text, &mut registry), 2);
        assert_eq!(registry.items()[0].title, "A");
        assert!(registry.items()[0].is_pinned);
        assert_eq!(registry.items()[1].description, "with, commas; and | pipes");
    }

    #[test]
    fn embedded_delimiters_are_scrubbed() {
        let codec = DelimiterCodec::new("|", "#").unwrap();
        let encoded = codec.encode(&record(0, "a|b", "c#d", false));
        assert_eq!(encoded, "0|a b|c d||0|#");

        let mut registry = FieldRegistry::new();
        codec.decode_into(&encoded, &mut registry);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.items()[0].title, "a b");
    }

    #[test]
    fn decode_tolerates_missing_newline_after_separator() {
        let codec = DelimiterCodec::default();
        let mut registry = FieldRegistry::new();
        let text = "0\u{1f}A\u{1f}B\u{1f}\u{1f}1\u{1f}\u{1e}1\u{1f}C\u{1f}D\u{1f}\u{1f}0\u{1f}\u{1e}";
        assert_eq!(codec.decode_into(text, &mut registry), 2);
    }

    #[test]
    fn rejects_overlapping_or_blank_delimiters() {
        assert!(DelimiterCodec::new("|", "||").is_err());
        assert!(DelimiterCodec::new("#", "#").is_err());
        assert!(DelimiterCodec::new(" ", "#").is_err());
        assert!(DelimiterCodec::new("|", "\n").is_err());
        assert!(DelimiterCodec::new("|", "#\n").is_ok());
    }
}
