use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keep track of short tasks from the terminal
#[derive(Parser, Debug)]
#[command(name = "todo", version)]
pub struct Cli {
    /// Config file to use instead of ./todo.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Title of the task; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Mark a task completed, or pending again
    Toggle {
        /// Id of the task, or a unique prefix of it
        id: String,
    },
    /// Delete a task
    Delete {
        /// Id of the task, or a unique prefix of it
        id: String,
    },
    /// List all tasks, newest first
    #[default]
    List,
    /// Show how many tasks are completed and pending
    Stats,
}
