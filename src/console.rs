//! Interactive numbered menu.
//!
//! Reads one choice per turn, prompts for the fields that choice needs,
//! dispatches the resulting `Command` and renders the outcome. Generic over
//! its reader and writer so a session can be scripted.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use colored::*;
use log::{info, warn};

use crate::command::{Command, Response};
use crate::domain::{Item, ItemId};
use crate::error::TodoError;
use crate::service::TaskService;
use crate::store::RecordStore;

const MENU: &str = "1) List  2) Add  3) Toggle  4) Edit  5) Delete  6) Search  7) Bulk Add  8) Quit";

/// Render one item as `"{id}. [{mark}] {title}"`.
pub fn render_item(item: &Item) -> String {
    format!("{}. [{}] {}", item.id, item.mark(), item.title)
}

/// Timing report for a bulk insert of `count` items.
pub fn render_bulk_summary(count: usize, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    let mut summary = format!("Added {} items in {:.3} seconds", count, secs);
    if count > 0 {
        summary.push_str(&format!("\nAverage time per item: {:.6} seconds", secs / count as f64));
    }
    summary
}

/// Why a turn could not produce a command.
#[derive(Debug)]
enum ReadError {
    /// Input is exhausted
    Eof,
    /// The operator typed something unusable; report it and keep going
    Invalid(TodoError),
    Io(io::Error),
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io(err)
    }
}

/// Line-oriented text interface over a reader and a writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the console and hand back the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run turns until the operator quits or input ends.
    pub fn run<S: RecordStore>(&mut self, service: &TaskService<S>) -> io::Result<()> {
        writeln!(self.output, "Using todo file: {}", service.store().location().display())?;

        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let command = match self.read_command() {
                Ok(command) => command,
                Err(ReadError::Eof) => break,
                Err(ReadError::Invalid(err)) => {
                    self.report(&err)?;
                    continue;
                }
                Err(ReadError::Io(err)) => return Err(err),
            };

            match service.dispatch(command) {
                Ok(response) if response.is_quit() => break,
                Ok(response) => self.render(&response)?,
                Err(err) => self.report(&err)?,
            }
        }

        info!("Console session ended");
        Ok(())
    }

    /// Read a menu choice and the fields it needs.
    fn read_command(&mut self) -> Result<Command, ReadError> {
        let choice = self.prompt("> ")?;

        match choice.as_str() {
            "1" => Ok(Command::List),
            "2" => Ok(Command::Add(self.prompt("New to-do title: ")?)),
            "3" => Ok(Command::Toggle(self.prompt_number("Id to toggle done: ")?)),
            "4" => {
                let id = self.prompt_number("Id to edit: ")?;
                Ok(Command::Edit(id, self.prompt("New title: ")?))
            }
            "5" => Ok(Command::Delete(self.prompt_number("Id to delete: ")?)),
            "6" => Ok(Command::Search(self.prompt("Search keyword: ")?)),
            "7" => Ok(Command::BulkInsert(self.prompt_number("How many items to add? ")?)),
            "8" => Ok(Command::Quit),
            other => Err(ReadError::Invalid(TodoError::InvalidInput(format!(
                "Choose 1-8, got '{}'",
                other
            )))),
        }
    }

    /// Read one trimmed line. A line that is not UTF-8 is invalid input.
    fn prompt(&mut self, label: &str) -> Result<String, ReadError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(ReadError::Eof);
        }
        let line = String::from_utf8(raw)
            .map_err(|_| ReadError::Invalid(TodoError::InvalidInput("input is not valid UTF-8".to_string())))?;
        Ok(line.trim().to_string())
    }

    fn prompt_number(&mut self, label: &str) -> Result<ItemId, ReadError> {
        let raw = self.prompt(label)?;
        parse_number(&raw).map_err(ReadError::Invalid)
    }

    fn render(&mut self, response: &Response) -> io::Result<()> {
        match response {
            Response::Listed(items) => {
                if items.is_empty() {
                    writeln!(self.output, "No to-dos yet.")?;
                }
                self.render_items(items)?;
            }
            Response::Added(item) => writeln!(self.output, "{} (id {})", "Added.".green(), item.id)?,
            Response::Toggled(_) => writeln!(self.output, "{}", "Toggled.".green())?,
            Response::Updated(_) => writeln!(self.output, "{}", "Updated.".green())?,
            Response::Unchanged => writeln!(self.output, "{}", "Title unchanged.".yellow())?,
            Response::Deleted(_) => writeln!(self.output, "{}", "Deleted.".green())?,
            Response::Found { keyword, items, elapsed } => {
                if items.is_empty() {
                    writeln!(self.output, "No matches found for '{}'", keyword)?;
                }
                self.render_items(items)?;
                writeln!(self.output, "Search completed in {:.6} seconds", elapsed.as_secs_f64())?;
            }
            Response::BulkAdded { items, elapsed } => {
                writeln!(self.output, "{}", render_bulk_summary(items.len(), *elapsed))?;
            }
            Response::Quit => {}
        }
        Ok(())
    }

    fn render_items(&mut self, items: &[Item]) -> io::Result<()> {
        for item in items {
            writeln!(self.output, "{}", render_item(item))?;
        }
        Ok(())
    }

    fn report(&mut self, err: &TodoError) -> io::Result<()> {
        if err.is_storage_failure() {
            warn!("Operation lost to storage failure: {}", err);
        }
        writeln!(self.output, "{}", err.to_string().red())
    }
}

fn parse_number(raw: &str) -> Result<i64, TodoError> {
    raw.parse()
        .map_err(|_| TodoError::InvalidInput(format!("Enter a number, got '{}'", raw)))
}
