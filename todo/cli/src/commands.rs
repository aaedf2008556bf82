//! Runs a parsed command against the store and renders the result.
use crate::cli::Commands;
use std::io::Write;
use thiserror::Error;
use todo_core::{PersistenceSlot, Task, TaskId, TodoStore, ValidationError};

#[derive(Error, Debug)]
pub enum Error {
    /// The task was rejected; the message is meant for the user.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to write output")]
    Output(#[from] std::io::Error),
}

pub fn execute<S: PersistenceSlot>(
    command: Commands,
    store: &mut TodoStore<S>,
    out: &mut impl Write,
) -> Result<(), Error> {
    match command {
        Commands::Add { title } => {
            let task = store.add(&title.join(" "))?;
            writeln!(out, "Added {}: {}", task.id(), task.title())?;
        }
        Commands::Toggle { id } => {
            let id = resolve_id(store, &id);
            if store.toggle(&id) {
                // toggle matched, so the task is still there
                if let Some(task) = store.get(&id) {
                    let verb = if task.is_completed() {
                        "Completed"
                    } else {
                        "Reopened"
                    };
                    writeln!(out, "{verb} {}", task.title())?;
                }
            } else {
                writeln!(out, "No task matches {id}")?;
            }
        }
        Commands::Delete { id } => {
            let id = resolve_id(store, &id);
            match store.delete(&id) {
                Some(task) => writeln!(out, "Deleted {}", task.title())?,
                None => writeln!(out, "No task matches {id}")?,
            }
        }
        Commands::List => {
            if store.is_empty() {
                writeln!(out, "No tasks yet")?;
            }
            for task in store.tasks() {
                writeln!(out, "{}", render(task))?;
            }
            writeln!(out, "{}", store.stats())?;
        }
        Commands::Stats => writeln!(out, "{}", store.stats())?,
    }
    Ok(())
}

/// Resolves user input to an id: an exact id wins, then a unique id prefix.
/// Anything else is taken literally.
fn resolve_id<S>(store: &TodoStore<S>, input: &str) -> TaskId {
    let literal = TaskId::from(input);
    if store.get(&literal).is_some() {
        return literal;
    }
    match store.find_by_prefix(input).as_slice() {
        [task] => task.id().clone(),
        _ => literal,
    }
}

fn render(task: &Task) -> String {
    let mark = if task.is_completed() { "x" } else { " " };
    format!("[{mark}] {} ({})", task.title(), task.id())
}
