//! todos - a single-user to-do list
//!
//! Items are persisted either as one JSON document rewritten on every change
//! or as rows of a SQLite table. The task service validates requests and
//! reconciles title uniqueness and id allocation across both backends.

pub mod command;
pub mod console;
pub mod domain;
pub mod error;
pub mod id;
pub mod service;
pub mod store;

pub use error::{Result, TodoError};
