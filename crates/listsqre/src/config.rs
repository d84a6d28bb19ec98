//! # Configuration
//!
//! Listsqre configuration is a [`confique`] struct, loaded in layers.
//!
//! ## Sources
//!
//! Resolved in priority order:
//! 1. **Environment variables**: `LISTSQRE_DATA_DIR`, `LISTSQRE_DB_FILE`.
//! 2. **Config file**: `listsqre.toml` in the data directory.
//! 3. **Compiled defaults**: `#[config(default = ...)]` below.
//!
//! The data directory itself is where the config file is looked up, so it is
//! resolved before the file is read: an explicit `--data` path wins, then
//! `LISTSQRE_DATA_DIR`, then the OS data directory. A `data_dir` key inside
//! the file is ignored.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data directory | Where the database and card files live |
//! | `db_file` | `listsqre.db` | SQLite file name inside the data directory |
//! | `files_dir` | `cards` | Sub-directory holding flat files |
//! | `field_delimiter` | `U+001F` | Separator between fields of a record |
//! | `record_delimiter` | `U+001E` + newline | Terminator of a record |
//!
//! Delimiters are validated when the codec is built, not when the file is
//! parsed.

use crate::codec::{DelimiterCodec, DEFAULT_FIELD_DELIMITER, DEFAULT_RECORD_DELIMITER};
use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "listsqre.toml";

/// Configuration for listsqre, stored in `listsqre.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ListsqreConfig {
    /// Directory holding the database and the card files.
    #[config(env = "LISTSQRE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// SQLite database file name, relative to the data directory.
    #[config(env = "LISTSQRE_DB_FILE", default = "listsqre.db")]
    pub db_file: String,

    /// Directory for flat files, relative to the data directory.
    #[config(default = "cards")]
    pub files_dir: String,

    /// Separator between the fields of one record.
    #[config(default = "\u{1f}")]
    pub field_delimiter: String,

    /// Terminator of one record.
    #[config(default = "\u{1e}\n")]
    pub record_delimiter: String,
}

impl Default for ListsqreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_file: "listsqre.db".to_string(),
            files_dir: "cards".to_string(),
            field_delimiter: DEFAULT_FIELD_DELIMITER.to_string(),
            record_delimiter: DEFAULT_RECORD_DELIMITER.to_string(),
        }
    }
}

impl ListsqreConfig {
    /// Environment plus `listsqre.toml` in `data_dir`. A missing file is not an
    /// error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config = Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE_NAME))
            .load()?;
        Ok(config)
    }

    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.db_file)
    }

    pub fn files_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.files_dir)
    }

    pub fn codec(&self) -> Result<DelimiterCodec> {
        DelimiterCodec::new(
            self.field_delimiter.as_str(),
            self.record_delimiter.as_str(),
        )
    }

    /// A commented sample `listsqre.toml`.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}
