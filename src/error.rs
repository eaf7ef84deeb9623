//! Error types for the match-pair engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid content format: {0}")]
    InvalidContentFormat(String),

    #[error("Duplicate pair id: {0}")]
    DuplicatePairId(u32),

    #[error("Failed to load progress for '{key}': {reason}")]
    PersistenceRead { key: String, reason: String },

    #[error("Failed to save progress for '{key}': {reason}")]
    PersistenceWrite { key: String, reason: String },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;
