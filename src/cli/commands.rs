//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and one subcommand per list operation:
//! list, add, toggle, edit, delete, search and bulk.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use todos::command::Command;
use todos::domain::ItemId;
use todos::id::IdPolicy;
use todos::store::Backend;

/// todos - a single-user to-do list on a JSON file or a SQLite table
#[derive(Parser, Debug)]
#[command(name = "todos")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Storage backend (overrides config)
    #[arg(short, long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Data file or database path (overrides config)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Id allocation policy for the snapshot backend (overrides config)
    #[arg(long, global = true, value_enum)]
    pub id_policy: Option<IdPolicy>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// One-shot subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List all items
    List,

    /// Add a new item
    Add {
        /// Title of the new item
        title: String,
    },

    /// Toggle the done flag of an item
    Toggle {
        /// Item ID
        id: ItemId,
    },

    /// Replace the title of an item
    Edit {
        /// Item ID
        id: ItemId,

        /// New title (empty leaves the item unchanged)
        title: String,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: ItemId,
    },

    /// Search titles for a keyword
    Search {
        /// Substring to look for
        keyword: String,
    },

    /// Add COUNT generated items in one batch
    Bulk {
        /// Number of items to add
        #[arg(allow_negative_numbers = true)]
        count: i64,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::List => Command::List,
            Commands::Add { title } => Command::Add(title),
            Commands::Toggle { id } => Command::Toggle(id),
            Commands::Edit { id, title } => Command::Edit(id, title),
            Commands::Delete { id } => Command::Delete(id),
            Commands::Search { keyword } => Command::Search(keyword),
            Commands::Bulk { count } => Command::BulkInsert(count),
        }
    }
}
