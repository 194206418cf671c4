use recall_algo::AlgoError;
use thiserror::Error;

use crate::storage::StorageError;

/// Every failure that ends an invocation
#[derive(Error, Debug)]
pub enum AppError {
    #[error("deck '{deck}' not found at {path}")]
    DeckNotFound { deck: String, path: String },

    #[error("deck '{deck}' is invalid: {reason}")]
    InvalidDeck { deck: String, reason: String },

    #[error("invalid count {num}: must be between 1 and {deck_size} (cards in deck)")]
    InvalidCount { num: usize, deck_size: usize },

    #[error("card '{0}' not found")]
    CardNotFound(String),

    #[error("card name '{name}' is ambiguous: matches {}", .ids.join(", "))]
    AmbiguousName { name: String, ids: Vec<String> },

    #[error(transparent)]
    InvalidOutcome(#[from] AlgoError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("review store failure: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit status for this error; 0 is reserved for success
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::DeckNotFound { .. } | AppError::InvalidDeck { .. } => 3,
            AppError::InvalidCount { .. } => 4,
            AppError::CardNotFound(_) | AppError::AmbiguousName { .. } => 5,
            AppError::InvalidOutcome(_) => 6,
            AppError::Storage(_) | AppError::Io(_) => 7,
            AppError::InvalidConfig(_) => 8,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
