//! CLI subcommand implementations.

pub mod add;
pub mod edit;
pub mod list;
pub mod summarize;
pub mod timesheet;
pub mod util;
