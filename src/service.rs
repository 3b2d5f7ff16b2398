//! Task service: validation and orchestration over a record store.
//!
//! Inputs are trimmed and validated before the store is touched. Title
//! uniqueness is checked here only when the store does not enforce it
//! itself; either way a collision surfaces as `TodoError::DuplicateTitle`.

use std::time::Instant;

use log::{debug, info};

use crate::command::{Command, Response};
use crate::domain::{Item, ItemId, bulk_title};
use crate::error::{Result, TodoError};
use crate::store::RecordStore;

/// Result of an edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    /// The new title was empty, so nothing changed
    Unchanged,
}

/// Use-case layer for the to-do list.
#[derive(Debug)]
pub struct TaskService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an item with a non-empty, unused title.
    pub fn add(&self, title: &str) -> Result<Item> {
        let title = non_empty(title, "title")?;

        if !self.store.enforces_unique_titles() {
            let items = self.store.load()?;
            if items.iter().any(|item| item.title == title) {
                return Err(TodoError::DuplicateTitle(title.to_string()));
            }
        }

        self.store.insert(title)
    }

    pub fn list(&self) -> Result<Vec<Item>> {
        self.store.load()
    }

    /// Flip the completion flag of `id`.
    pub fn toggle(&self, id: ItemId) -> Result<()> {
        if self.store.toggle_done(id)? {
            info!("Toggled item {}", id);
            Ok(())
        } else {
            Err(TodoError::NotFound(id))
        }
    }

    /// Retitle `id`. An empty title is a no-op, not an error.
    pub fn edit(&self, id: ItemId, new_title: &str) -> Result<EditOutcome> {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            debug!("Edit of {} with empty title left it unchanged", id);
            return Ok(EditOutcome::Unchanged);
        }

        if !self.store.enforces_unique_titles() {
            let items = self.store.load()?;
            if !items.iter().any(|item| item.id == id) {
                return Err(TodoError::NotFound(id));
            }
            if items.iter().any(|item| item.id != id && item.title == new_title) {
                return Err(TodoError::DuplicateTitle(new_title.to_string()));
            }
        }

        if self.store.update_title(id, new_title)? {
            info!("Retitled item {}", id);
            Ok(EditOutcome::Updated)
        } else {
            Err(TodoError::NotFound(id))
        }
    }

    /// Permanently remove `id`.
    pub fn delete(&self, id: ItemId) -> Result<()> {
        if self.store.delete(id)? {
            info!("Deleted item {}", id);
            Ok(())
        } else {
            Err(TodoError::NotFound(id))
        }
    }

    /// Items whose title contains `keyword`; case rules follow the store.
    pub fn search(&self, keyword: &str) -> Result<Vec<Item>> {
        let keyword = non_empty(keyword, "search keyword")?;
        self.store.search(keyword)
    }

    /// Create `count` items titled "Bulk item #1" .. "Bulk item #count" as one batch.
    pub fn bulk_insert(&self, count: i64) -> Result<Vec<Item>> {
        if count <= 0 {
            return Err(TodoError::InvalidInput(format!(
                "count must be a positive number, got {}",
                count
            )));
        }

        let titles: Vec<String> = (1..=count).map(bulk_title).collect();

        if !self.store.enforces_unique_titles() {
            let items = self.store.load()?;
            if let Some(taken) = titles.iter().find(|t| items.iter().any(|item| &item.title == *t)) {
                return Err(TodoError::DuplicateTitle(taken.clone()));
            }
        }

        self.store.insert_batch(&titles)
    }

    /// Run one command from the interface loop.
    pub fn dispatch(&self, command: Command) -> Result<Response> {
        debug!("Dispatching {:?}", command);
        match command {
            Command::List => self.list().map(Response::Listed),
            Command::Add(title) => self.add(&title).map(Response::Added),
            Command::Toggle(id) => self.toggle(id).map(|()| Response::Toggled(id)),
            Command::Edit(id, title) => self.edit(id, &title).map(|outcome| match outcome {
                EditOutcome::Updated => Response::Updated(id),
                EditOutcome::Unchanged => Response::Unchanged,
            }),
            Command::Delete(id) => self.delete(id).map(|()| Response::Deleted(id)),
            Command::Search(keyword) => {
                let start = Instant::now();
                let items = self.search(&keyword)?;
                Ok(Response::Found {
                    keyword: keyword.trim().to_string(),
                    items,
                    elapsed: start.elapsed(),
                })
            }
            Command::BulkInsert(count) => {
                let start = Instant::now();
                let items = self.bulk_insert(count)?;
                Ok(Response::BulkAdded {
                    items,
                    elapsed: start.elapsed(),
                })
            }
            Command::Quit => Ok(Response::Quit),
        }
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(TodoError::InvalidInput(format!("{} is empty", what)))
    } else {
        Ok(value)
    }
}
