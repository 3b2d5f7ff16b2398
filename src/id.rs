//! ID allocation for new items
//!
//! Two policies exist and they are intentionally incompatible:
//! - `GapFilling` returns the smallest positive id not in use, so ids of
//!   deleted items are recycled by the next add.
//! - `MonotonicMax` returns one past the highest id in use.
//!
//! The SQLite store does not use either; its `AUTOINCREMENT` key never
//! regresses, even after the highest row is deleted.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ItemId;
use crate::error::{Result, TodoError};

/// Strategy for picking the id of a newly created item.
pub trait IdAllocator {
    /// Pick the next id given every id currently in use.
    ///
    /// Fails when no positive id is left to hand out.
    fn next_id(&self, in_use: &BTreeSet<ItemId>) -> Result<ItemId>;
}

/// Smallest positive integer not currently in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapFilling;

impl IdAllocator for GapFilling {
    fn next_id(&self, in_use: &BTreeSet<ItemId>) -> Result<ItemId> {
        let mut candidate: ItemId = 1;
        for &id in in_use.range(1..) {
            if id != candidate {
                break;
            }
            candidate = candidate.checked_add(1).ok_or_else(exhausted)?;
        }
        Ok(candidate)
    }
}

/// `max(in_use) + 1`, or 1 for an empty collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicMax;

impl IdAllocator for MonotonicMax {
    fn next_id(&self, in_use: &BTreeSet<ItemId>) -> Result<ItemId> {
        match in_use.last() {
            None => Ok(1),
            Some(&max) => max.max(0).checked_add(1).ok_or_else(exhausted),
        }
    }
}

/// Config-selectable allocation policy for the snapshot store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    #[default]
    GapFilling,
    MonotonicMax,
}

impl IdAllocator for IdPolicy {
    fn next_id(&self, in_use: &BTreeSet<ItemId>) -> Result<ItemId> {
        match self {
            IdPolicy::GapFilling => GapFilling.next_id(in_use),
            IdPolicy::MonotonicMax => MonotonicMax.next_id(in_use),
        }
    }
}

fn exhausted() -> TodoError {
    TodoError::StorageUnavailable(format!("no id left above {}", ItemId::MAX))
}

impl fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdPolicy::GapFilling => write!(f, "gap-filling"),
            IdPolicy::MonotonicMax => write!(f, "monotonic-max"),
        }
    }
}
