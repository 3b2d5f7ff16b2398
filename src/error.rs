//! Error types for todos
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::domain::ItemId;

/// All error types that can occur while operating on the to-do list
#[derive(Debug, Error)]
pub enum TodoError {
    /// Empty title/keyword, non-numeric id/count, non-positive count
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another item already carries this title
    #[error("That title already exists: {0}")]
    DuplicateTitle(String),

    /// No item has the given id
    #[error("Id not found: {0}")]
    NotFound(ItemId),

    /// The data file or database could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A bulk insert was rolled back; no items were added
    #[error("Batch failed, no items were added: {0}")]
    BatchFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error other than a uniqueness violation
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl TodoError {
    /// True for failures of the durable medium rather than of the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            TodoError::StorageUnavailable(_) | TodoError::Io(_) | TodoError::Json(_) | TodoError::Sqlite(_)
        )
    }
}

/// Result type alias for to-do operations
pub type Result<T> = std::result::Result<T, TodoError>;
