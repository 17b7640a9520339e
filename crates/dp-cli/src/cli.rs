//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::edit::{MoveArgs, RemoveArgs, ResizeArgs, SplitArgs};
use crate::commands::list::ListArgs;
use crate::commands::summarize::SummarizeArgs;
use crate::commands::timesheet::TimesheetArgs;

/// Plan and account for your day.
///
/// Keeps one plain-text file per day, resolves overlapping events by category
/// priority, and reports totals and timesheets.
#[derive(Debug, Parser)]
#[command(name = "dayplan", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Minutes spent per category over a range of days.
    Summarize(SummarizeArgs),

    /// Start, break and end of the matched categories, one row per day.
    Timesheet(TimesheetArgs),

    /// Add an event, optionally repeating it.
    Add(AddArgs),

    /// List the events of a day.
    List(ListArgs),

    /// Split an event in two.
    Split(SplitArgs),

    /// Move an event, optionally pushing its neighbours.
    Move(MoveArgs),

    /// Change the end of an event.
    Resize(ResizeArgs),

    /// Remove an event.
    Remove(RemoveArgs),
}
