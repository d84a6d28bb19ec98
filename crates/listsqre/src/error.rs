use crate::model::CardId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid card id: {0} (card ids are positive integers)")]
    InvalidCardId(i64),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Invalid delimiters: {0}")]
    InvalidDelimiters(String),

    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("No field table for card {0}")]
    TableMissing(CardId),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Dispatch(String),
}

impl From<confique::Error> for StoreError {
    fn from(err: confique::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Dispatch(err.to_string())
    }
}

impl StoreError {
    /// True for errors that mean "the thing is not there" rather than a failure
    /// of the storage medium.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::CardNotFound(_) | StoreError::TableMissing(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
