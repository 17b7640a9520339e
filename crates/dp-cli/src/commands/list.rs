//! List command: a day's events in canonical order.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use dp_core::EventList;

use super::util::parse_date;
use crate::Config;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: NaiveDate,

    /// Show the overlap-free view instead of the stored events.
    #[arg(long)]
    pub flat: bool,
}

/// Renders one `index HH:MM-HH:MM category name` line per event.
///
/// Indices are the positions the editing commands take.
fn format_list(list: &EventList, date: NaiveDate) -> String {
    if list.is_empty() {
        return format!("No events on {date}.\n");
    }
    list.events()
        .enumerate()
        .map(|(index, event)| format!("{index} {event}\n"))
        .collect()
}

/// Runs the list command.
pub fn run(args: &ListArgs, config: &Config) -> Result<()> {
    let list = config
        .store()
        .load_day(args.date)
        .with_context(|| format!("failed to load {}", args.date))?;
    let list = if args.flat {
        config.planner().flatten(&list)
    } else {
        list
    };

    print!("{}", format_list(&list, args.date));
    Ok(())
}
