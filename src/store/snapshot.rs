//! Snapshot store: the whole collection as one JSON document.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::traits::RecordStore;
use crate::domain::{Item, ItemId};
use crate::error::{Result, TodoError};
use crate::id::{IdAllocator, IdPolicy};

/// JSON-document store that rewrites the entire file on every mutation.
///
/// Each mutating call loads the full collection, applies the change in
/// memory and persists the full collection back, so every operation costs
/// O(n) in time and I/O. Concurrent writers are not guarded; last writer wins.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    policy: IdPolicy,
}

impl SnapshotStore {
    /// Create a store for the document at `path`. Nothing is touched on disk
    /// until the first operation.
    pub fn new(path: impl AsRef<Path>, policy: IdPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy,
        }
    }

    /// The id allocation policy in use.
    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    /// Replace the whole document with `items`.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// original, so an interrupted save leaves the previous contents intact.
    pub fn save(&self, items: &[Item]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }

        let json = serde_json::to_string_pretty(items)?;
        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json).map_err(|e| self.unavailable(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.unavailable(e))?;

        debug!("Saved {} items to {}", items.len(), self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> TodoError {
        TodoError::StorageUnavailable(format!("{}: {}", self.path.display(), err))
    }

    /// Load, let `f` mutate, and persist only when `f` reports a change.
    fn apply<T>(&self, f: impl FnOnce(&mut Vec<Item>) -> Result<Option<T>>) -> Result<Option<T>> {
        let mut items = self.load()?;
        let outcome = f(&mut items)?;
        if outcome.is_some() {
            self.save(&items)?;
        }
        Ok(outcome)
    }

    fn ids_in_use(items: &[Item]) -> BTreeSet<ItemId> {
        items.iter().map(|item| item.id).collect()
    }
}

impl RecordStore for SnapshotStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn enforces_unique_titles(&self) -> bool {
        false
    }

    fn load(&self) -> Result<Vec<Item>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.unavailable(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<Item> = serde_json::from_str(&content).map_err(|e| self.unavailable(e))?;
        debug!("Loaded {} items from {}", items.len(), self.path.display());
        Ok(items)
    }

    fn insert(&self, title: &str) -> Result<Item> {
        let policy = self.policy;
        let item = self.apply(|items| {
            let id = policy.next_id(&Self::ids_in_use(items))?;
            let item = Item::new(id, title);
            items.push(item.clone());
            Ok(Some(item))
        })?;

        let item = item.ok_or_else(|| self.unavailable("insert produced no item"))?;
        info!("Added item {} ({} policy)", item.id, policy);
        Ok(item)
    }

    fn insert_batch(&self, titles: &[String]) -> Result<Vec<Item>> {
        let policy = self.policy;
        let added = self.apply(|items| {
            let mut in_use = Self::ids_in_use(items);
            let mut added = Vec::with_capacity(titles.len());
            for title in titles {
                let id = policy.next_id(&in_use)?;
                in_use.insert(id);
                let item = Item::new(id, title.as_str());
                items.push(item.clone());
                added.push(item);
            }
            Ok(Some(added))
        })?;

        let added = added.unwrap_or_default();
        info!("Added {} items in one snapshot write", added.len());
        Ok(added)
    }

    fn update_title(&self, id: ItemId, title: &str) -> Result<bool> {
        let applied = self.apply(|items| {
            Ok(items.iter_mut().find(|item| item.id == id).map(|item| {
                item.title = title.to_string();
            }))
        })?;
        Ok(applied.is_some())
    }

    fn toggle_done(&self, id: ItemId) -> Result<bool> {
        let applied = self.apply(|items| {
            Ok(items.iter_mut().find(|item| item.id == id).map(|item| {
                item.done = !item.done;
            }))
        })?;
        Ok(applied.is_some())
    }

    fn delete(&self, id: ItemId) -> Result<bool> {
        let applied = self.apply(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            Ok((items.len() < before).then_some(()))
        })?;
        Ok(applied.is_some())
    }

    /// Case-insensitive scan over every item.
    fn search(&self, needle: &str) -> Result<Vec<Item>> {
        let needle = needle.to_lowercase();
        let mut found: Vec<Item> = self
            .load()?
            .into_iter()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .collect();
        found.sort_by_key(|item| item.id);
        Ok(found)
    }
}
