//! Record stores for todos.
//!
//! Two interchangeable backends keep the authoritative list of items:
//! - **Snapshot store**: the whole collection as one pretty-printed JSON
//!   document, loaded and rewritten wholesale by every mutation.
//! - **SQLite store**: one row per item in a `todos` table, mutated by
//!   single statements with engine-enforced title uniqueness.
//!
//! # Example
//!
//! ```ignore
//! use todos::id::IdPolicy;
//! use todos::store::{RecordStore, SnapshotStore};
//!
//! let store = SnapshotStore::new("todos.json", IdPolicy::GapFilling);
//! let item = store.insert("Buy milk")?;
//! assert!(store.toggle_done(item.id)?);
//! ```

mod snapshot;
mod sqlite;
mod traits;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;
pub use traits::RecordStore;

/// Which backend persists the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Whole-file JSON document
    #[default]
    Snapshot,
    /// SQLite table
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Snapshot => write!(f, "snapshot"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}
