//! Timesheet command: one `date,start,break,end` row per worked day.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use dp_core::{CategoryMatcher, CategoryPriorities, EventList, Planner, TimesheetEntry};

use super::util::{category_matcher, parse_date};
use crate::Config;

#[derive(Debug, Args)]
pub struct TimesheetArgs {
    /// First day of the range.
    #[arg(long, value_parser = parse_date)]
    pub from: NaiveDate,

    /// Last day of the range, inclusive.
    #[arg(long, value_parser = parse_date)]
    pub til: NaiveDate,

    /// Regex selecting the working categories (full match).
    #[arg(long)]
    pub category: String,

    /// Print `date,,,` for days without matching events.
    #[arg(long)]
    pub include_empty: bool,
}

fn entries<M: CategoryMatcher>(
    planner: &Planner<CategoryPriorities>,
    days: &[(NaiveDate, EventList)],
    matcher: &M,
) -> Result<Vec<(NaiveDate, Option<TimesheetEntry>)>> {
    days.iter()
        .map(|(date, list)| {
            let entry = planner
                .timesheet_entry(list, matcher)
                .with_context(|| format!("failed to build timesheet for {date}"))?;
            Ok((*date, entry))
        })
        .collect()
}

fn format_rows(rows: &[(NaiveDate, Option<TimesheetEntry>)], include_empty: bool) -> String {
    rows.iter()
        .filter_map(|(date, entry)| match entry {
            Some(entry) => Some(format!("{date},{entry}\n")),
            None if include_empty => Some(format!("{date},,,\n")),
            None => None,
        })
        .collect()
}

fn timesheet(args: &TimesheetArgs, config: &Config) -> Result<String> {
    if args.til < args.from {
        bail!("--til ({}) is before --from ({})", args.til, args.from);
    }
    let matcher = category_matcher(&args.category)?;

    let days = config
        .store()
        .load_range(args.from, args.til)
        .with_context(|| format!("failed to load days {} to {}", args.from, args.til))?;
    let rows = entries(&config.planner(), &days, &matcher)?;

    let worked = rows.iter().filter(|(_, entry)| entry.is_some()).count();
    tracing::debug!(days = rows.len(), worked, "built timesheet");

    Ok(format_rows(&rows, args.include_empty))
}

/// Runs the timesheet command.
pub fn run(args: &TimesheetArgs, config: &Config) -> Result<()> {
    print!("{}", timesheet(args, config)?);
    Ok(())
}
