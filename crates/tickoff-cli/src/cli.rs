use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tickoff_core::tasks::{Filter, TaskId};

/// CLI surface definition.
#[derive(Parser, Debug)]
#[command(
    name = "tickoff",
    about = "A small to-do list for the terminal",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Directory holding the task and theme slots (overrides config).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Keep everything in memory for this run; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,
    /// Optional subcommand; defaults to launching the TUI when absent.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Launch the interactive TUI (press q to exit).
    Tui,
    /// Print version and exit.
    Version,
    /// Check that the data directory can be written and read back.
    Health,
    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Script the task list without the TUI.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Show or flip the color theme.
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Create a default config file if one does not exist.
    Init,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// List tasks.
    List {
        /// One of all, active, completed, important.
        #[arg(long, short, default_value = "all")]
        filter: Filter,
    },
    /// Add a task.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Toggle a task between active and completed.
    Done { id: TaskId },
    /// Toggle the important star on a task.
    Star { id: TaskId },
    /// Replace a task's text.
    Edit {
        id: TaskId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete a task.
    Rm { id: TaskId },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeCommand {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
}
