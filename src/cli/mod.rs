//! CLI module for todos - command-line interface and subcommands.
//!
//! With no subcommand the interactive menu is launched; each subcommand
//! runs a single operation and exits.

pub mod commands;

pub use commands::Cli;
