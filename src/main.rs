use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use todos::command::{Command, Response};
use todos::console::{Console, render_bulk_summary, render_item};
use todos::service::TaskService;
use todos::store::{Backend, RecordStore, SnapshotStore, SqliteStore};

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todos")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("todos.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Fold CLI overrides into the loaded configuration.
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }
    if let Some(policy) = cli.id_policy {
        config.storage.id_policy = policy;
    }
    if let Some(data) = &cli.data {
        match config.storage.backend {
            Backend::Snapshot => config.storage.snapshot_path = data.clone(),
            Backend::Sqlite => config.storage.sqlite_path = data.clone(),
        }
    }
}

fn open_store(config: &Config) -> Result<Box<dyn RecordStore>> {
    let storage = &config.storage;
    let store: Box<dyn RecordStore> = match storage.backend {
        Backend::Snapshot => Box::new(SnapshotStore::new(&storage.snapshot_path, storage.id_policy)),
        Backend::Sqlite => Box::new(
            SqliteStore::open(&storage.sqlite_path)
                .with_context(|| format!("Failed to open database {}", storage.sqlite_path.display()))?,
        ),
    };
    info!("Using {} backend at {}", storage.backend, storage.data_path().display());
    Ok(store)
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!(
            "{} {} backend, {} ids",
            "Verbose mode enabled:".yellow(),
            config.storage.backend,
            config.storage.id_policy
        );
    }

    let service = TaskService::new(open_store(config)?);

    match &cli.command {
        None => run_console(&service),
        Some(command) => run_once(&service, command.clone()),
    }
}

fn run_console(service: &TaskService<Box<dyn RecordStore>>) -> Result<()> {
    info!("Launching interactive menu");
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    console.run(service).context("Console I/O failed")?;
    Ok(())
}

fn run_once(service: &TaskService<Box<dyn RecordStore>>, command: Commands) -> Result<()> {
    let command: Command = command.into();
    info!("Running one-shot command: {:?}", command);

    let response = service.dispatch(command)?;
    match &response {
        Response::Listed(items) if items.is_empty() => println!("No to-dos yet."),
        Response::Listed(items) => items.iter().for_each(|item| println!("{}", render_item(item))),
        Response::Added(item) => println!("{} {}", "Added:".green(), render_item(item)),
        Response::Toggled(id) => println!("{} {}", "Toggled:".green(), id),
        Response::Updated(id) => println!("{} {}", "Updated:".green(), id),
        Response::Unchanged => println!("{}", "Title unchanged.".yellow()),
        Response::Deleted(id) => println!("{} {}", "Deleted:".red(), id),
        Response::Found { keyword, items, elapsed } => {
            if items.is_empty() {
                println!("No matches found for '{}'", keyword);
            }
            items.iter().for_each(|item| println!("{}", render_item(item)));
            println!("Search completed in {:.6} seconds", elapsed.as_secs_f64());
        }
        Response::BulkAdded { items, elapsed } => println!("{}", render_bulk_summary(items.len(), *elapsed)),
        Response::Quit => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_overrides(&cli, &mut config);

    // Setup logging once the level is known
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
