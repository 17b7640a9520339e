//! Add command, optionally repeating the event on later days.

use anyhow::{Context, Result, bail};
use chrono::{Days, Months, NaiveDate};
use clap::{Args, ValueEnum};
use dp_core::{Category, Event};

use super::util::{parse_date, parse_time};
use crate::Config;

/// How often a repeated event recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Repeat {
    Daily,
    Weekly,
    /// Same day of month; short months clamp to their last day.
    Monthly,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Day of the (first) event.
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: NaiveDate,

    /// Start time, `HH:MM`.
    #[arg(long)]
    pub start: String,

    /// End time, `HH:MM`; `24:00` is midnight at the end of the day.
    #[arg(long)]
    pub end: String,

    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub name: String,

    /// Repeat the event until `--til`.
    #[arg(long, value_enum, requires = "til")]
    pub repeat: Option<Repeat>,

    /// Last day a repeated event may fall on, inclusive.
    #[arg(long, value_parser = parse_date, requires = "repeat")]
    pub til: Option<NaiveDate>,
}

/// Dates the event is added to, in ascending order.
fn occurrences(date: NaiveDate, repeat: Option<Repeat>, til: Option<NaiveDate>) -> Result<Vec<NaiveDate>> {
    let Some(repeat) = repeat else {
        return Ok(vec![date]);
    };
    let Some(til) = til else {
        bail!("--repeat requires --til");
    };
    if til < date {
        bail!("--til ({til}) is before --date ({date})");
    }

    let mut dates = Vec::new();
    for step in 0_u32.. {
        let next = match repeat {
            Repeat::Daily => date.checked_add_days(Days::new(u64::from(step))),
            Repeat::Weekly => date.checked_add_days(Days::new(7 * u64::from(step))),
            Repeat::Monthly => date.checked_add_months(Months::new(step)),
        };
        match next {
            Some(next) if next <= til => dates.push(next),
            _ => break,
        }
    }
    Ok(dates)
}

fn event_on(args: &AddArgs, date: NaiveDate, category: &Category) -> Result<Event> {
    let start = parse_time(&args.start, date)?;
    let end = parse_time(&args.end, date)?;
    Event::new(start, end, args.name.as_str(), category.clone())
        .with_context(|| format!("invalid event {}-{}", args.start, args.end))
}

fn add(args: &AddArgs, config: &Config) -> Result<Vec<(NaiveDate, Event)>> {
    let category = Category::new(args.category.as_str()).context("invalid category")?;
    let dates = occurrences(args.date, args.repeat, args.til)?;
    let store = config.store();

    // Every occurrence is loaded and checked before any day is written.
    let mut pending = Vec::with_capacity(dates.len());
    for date in dates {
        let event = event_on(args, date, &category)?;
        let mut list = store
            .load_day(date)
            .with_context(|| format!("failed to load {date}"))?;
        list.add_event(event.clone())
            .with_context(|| format!("cannot add {event} on {date}"))?;
        pending.push((date, list, event));
    }

    let mut added = Vec::with_capacity(pending.len());
    for (date, list, event) in pending {
        store
            .save_day(date, &list)
            .with_context(|| format!("failed to save {date}"))?;
        tracing::info!(%date, %event, "added event");
        added.push((date, event));
    }
    Ok(added)
}

/// Runs the add command.
pub fn run(args: &AddArgs, config: &Config) -> Result<()> {
    for (date, event) in add(args, config)? {
        println!("{date} {event}");
    }
    Ok(())
}
