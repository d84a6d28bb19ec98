//! # Data Directory Resolution
//!
//! Everything listsqre stores lives under one data directory:
//!
//! 1. If `data_override` is provided (the CLI's `--data`), use it.
//! 2. Else, if `LISTSQRE_DATA_DIR` is set, use that.
//! 3. Else, use the OS-appropriate data directory (via the `directories`
//!    crate).
//!
//! [`initialize`] then loads [`ListsqreConfig`] from that directory, opens the
//! database and wires the flat-file store with the configured codec.

use crate::api::ListsqreApi;
use crate::config::ListsqreConfig;
use crate::error::{Result, StoreError};
use crate::store::db::Database;
use crate::store::flat_file::FlatFileStore;
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub const DATA_DIR_ENV: &str = "LISTSQRE_DATA_DIR";

pub struct ListsqreContext {
    pub api: ListsqreApi<FsBackend>,
    pub config: ListsqreConfig,
    pub data_dir: PathBuf,
}

pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "listsqre", "listsqre")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StoreError::Config("could not determine a data directory".to_string()))
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    match std::env::var_os(DATA_DIR_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => default_data_dir(),
    }
}

/// Resolve the data directory, load configuration and open both stores.
pub fn initialize(data_override: Option<PathBuf>) -> Result<ListsqreContext> {
    let data_dir = resolve_data_dir(data_override)?;
    std::fs::create_dir_all(&data_dir)?;

    let config = ListsqreConfig::load(&data_dir)?;
    let codec = config.codec()?;
    let db = Database::open(&config.db_path(&data_dir))?;
    let files =
        FlatFileStore::with_backend(FsBackend::new(config.files_path(&data_dir))).with_codec(codec);

    debug!(data_dir = %data_dir.display(), "initialized listsqre");
    Ok(ListsqreContext {
        api: ListsqreApi::new(db, files),
        config,
        data_dir,
    })
}
