//! The to-do item record.

use serde::{Deserialize, Serialize};

/// Positive integer identifier, stable for the lifetime of the item.
pub type ItemId = i64;

/// Prefix of the titles generated by a bulk insert.
pub const BULK_TITLE_PREFIX: &str = "Bulk item #";

/// A single to-do entry.
///
/// Field order matches the snapshot document: `id`, `title`, `done`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Item {
    /// Create a new, not yet completed item.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    /// Check mark used when rendering the item.
    pub fn mark(&self) -> char {
        if self.done { '✓' } else { ' ' }
    }
}

/// Title of the `index`-th (1-based) item of a bulk insert.
pub fn bulk_title(index: i64) -> String {
    format!("{}{}", BULK_TITLE_PREFIX, index)
}
