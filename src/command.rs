//! Operation contract between a text interface and the task service.
//!
//! An interface supplies one `Command` per turn and renders the `Response`
//! (or the `TodoError`) it gets back.

use std::time::Duration;

use crate::domain::{Item, ItemId};

/// One operator request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(String),
    Toggle(ItemId),
    Edit(ItemId, String),
    Delete(ItemId),
    Search(String),
    BulkInsert(i64),
    Quit,
}

/// Result descriptor for a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Every item, in the backend's listing order
    Listed(Vec<Item>),
    /// The newly created item
    Added(Item),
    Toggled(ItemId),
    Updated(ItemId),
    /// Edit with an empty title; nothing was written
    Unchanged,
    Deleted(ItemId),
    /// Search matches and how long the lookup took
    Found {
        keyword: String,
        items: Vec<Item>,
        elapsed: Duration,
    },
    /// Bulk insert committed and how long it took
    BulkAdded { items: Vec<Item>, elapsed: Duration },
    Quit,
}

impl Response {
    /// Items carried by the response, if any.
    pub fn items(&self) -> Option<&[Item]> {
        match self {
            Response::Listed(items) | Response::Found { items, .. } | Response::BulkAdded { items, .. } => {
                Some(items)
            }
            Response::Added(item) => Some(std::slice::from_ref(item)),
            _ => None,
        }
    }

    /// Whether the interface loop should stop.
    pub fn is_quit(&self) -> bool {
        matches!(self, Response::Quit)
    }
}
