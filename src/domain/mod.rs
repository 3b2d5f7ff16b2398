//! Domain types for todos
//!
//! The to-do list has a single entity, the `Item`: an integer id, a unique
//! title and a completion flag.

pub mod item;

pub use item::{BULK_TITLE_PREFIX, Item, ItemId, bulk_title};
