//! Record store trait definition.

use std::path::Path;

use crate::domain::{Item, ItemId};
use crate::error::Result;

/// Durable storage for the item collection.
///
/// Every call is one unit of work: the medium is opened, used and released
/// before returning. Mutations addressed by id report whether a row was
/// affected so callers can tell "not found" from "applied".
pub trait RecordStore {
    /// Location of the data file or database.
    fn location(&self) -> &Path;

    /// Whether the medium itself rejects duplicate titles.
    ///
    /// When false the service checks uniqueness before mutating.
    fn enforces_unique_titles(&self) -> bool;

    /// All items, in the backend's listing order.
    fn load(&self) -> Result<Vec<Item>>;

    /// Create one item and return it with its assigned id.
    fn insert(&self, title: &str) -> Result<Item>;

    /// Create every title or none of them.
    fn insert_batch(&self, titles: &[String]) -> Result<Vec<Item>>;

    /// Replace the title of one item.
    fn update_title(&self, id: ItemId, title: &str) -> Result<bool>;

    /// Flip the `done` flag of one item.
    fn toggle_done(&self, id: ItemId) -> Result<bool>;

    /// Permanently remove one item.
    fn delete(&self, id: ItemId) -> Result<bool>;

    /// Items whose title contains `needle`, in id order.
    fn search(&self, needle: &str) -> Result<Vec<Item>>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn location(&self) -> &Path {
        (**self).location()
    }

    fn enforces_unique_titles(&self) -> bool {
        (**self).enforces_unique_titles()
    }

    fn load(&self) -> Result<Vec<Item>> {
        (**self).load()
    }

    fn insert(&self, title: &str) -> Result<Item> {
        (**self).insert(title)
    }

    fn insert_batch(&self, titles: &[String]) -> Result<Vec<Item>> {
        (**self).insert_batch(titles)
    }

    fn update_title(&self, id: ItemId, title: &str) -> Result<bool> {
        (**self).update_title(id, title)
    }

    fn toggle_done(&self, id: ItemId) -> Result<bool> {
        (**self).toggle_done(id)
    }

    fn delete(&self, id: ItemId) -> Result<bool> {
        (**self).delete(id)
    }

    fn search(&self, needle: &str) -> Result<Vec<Item>> {
        (**self).search(needle)
    }
}
