// ABOUTME: Error types for the deckmark application
// ABOUTME: Provides structured error handling for the I/O surfaces around the parser

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Path not found: {0:?}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Nothing to parse: {0:?} is empty")]
    EmptyInputError(PathBuf),

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Failed to serialize outline: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

impl From<glob::GlobError> for DeckError {
    fn from(err: glob::GlobError) -> Self {
        DeckError::ValidationError(format!("Unreadable directory entry: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
