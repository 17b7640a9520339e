//! Editing commands: split, move, resize and remove one stored event.
//!
//! Events are addressed by their index in `dayplan list` (canonical order).
//! Each command loads the day, applies one engine operation and saves the day
//! again; a failed operation leaves the file untouched.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use dp_core::{EventId, EventList};

use super::util::{event_at, minutes, parse_date, parse_time};
use crate::Config;

#[derive(Debug, Args)]
pub struct SplitArgs {
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: NaiveDate,

    /// Index of the event, as shown by `list`.
    #[arg(long)]
    pub index: usize,

    /// Split point, `HH:MM`; must lie strictly inside the event.
    #[arg(long)]
    pub at: String,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: NaiveDate,

    /// Index of the event, as shown by `list`.
    #[arg(long)]
    pub index: usize,

    /// Shift in minutes; negative moves earlier.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "to", conflicts_with = "to")]
    pub by: Option<i64>,

    /// New start time, `HH:MM`.
    #[arg(long)]
    pub to: Option<String>,

    /// Push following (or preceding) events out of the way.
    #[arg(long, requires = "by")]
    pub push: bool,
}

#[derive(Debug, Args)]
pub struct ResizeArgs {
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: NaiveDate,

    /// Index of the event, as shown by `list`.
    #[arg(long)]
    pub index: usize,

    /// Change of the end time in minutes; negative shortens.
    #[arg(long, allow_negative_numbers = true, required_unless_present = "to", conflicts_with = "to")]
    pub by: Option<i64>,

    /// New end time, `HH:MM`.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: NaiveDate,

    /// Index of the event, as shown by `list`.
    #[arg(long)]
    pub index: usize,
}

/// Loads `date`, applies `edit` to the event at `index`, and saves the day.
///
/// Returns the edited list so callers can report the result.
fn edit_day<F>(config: &Config, date: NaiveDate, index: usize, edit: F) -> Result<EventList>
where
    F: FnOnce(&mut EventList, EventId) -> Result<()>,
{
    let store = config.store();
    let mut list = store
        .load_day(date)
        .with_context(|| format!("failed to load {date}"))?;
    let id = event_at(&list, index, date)?;

    edit(&mut list, id)?;

    store
        .save_day(date, &list)
        .with_context(|| format!("failed to save {date}"))?;
    Ok(list)
}

fn split(args: &SplitArgs, config: &Config) -> Result<EventList> {
    let at = parse_time(&args.at, args.date)?;
    edit_day(config, args.date, args.index, |list, id| {
        list.split_event(id, at)
            .with_context(|| format!("cannot split event {} at {}", args.index, args.at))?;
        Ok(())
    })
}

fn move_event(args: &MoveArgs, config: &Config) -> Result<EventList> {
    edit_day(config, args.date, args.index, |list, id| {
        let moved = match (args.by, args.to.as_deref()) {
            (Some(by), _) if args.push => {
                list.move_events_pushing_by(id, minutes(by, "--by")?, config.push_min_gap()?)
            }
            (Some(by), _) => list.move_single_event_by(id, minutes(by, "--by")?),
            (None, Some(to)) => list.move_single_event_to(id, parse_time(to, args.date)?),
            (None, None) => bail!("either --by or --to is required"),
        };
        moved.with_context(|| format!("cannot move event {}", args.index))
    })
}

fn resize(args: &ResizeArgs, config: &Config) -> Result<EventList> {
    edit_day(config, args.date, args.index, |list, id| {
        let resized = match (args.by, args.to.as_deref()) {
            (Some(by), _) => list.resize_by(id, minutes(by, "--by")?),
            (None, Some(to)) => list.resize_to(id, parse_time(to, args.date)?),
            (None, None) => bail!("either --by or --to is required"),
        };
        resized.with_context(|| format!("cannot resize event {}", args.index))
    })
}

fn remove(args: &RemoveArgs, config: &Config) -> Result<EventList> {
    edit_day(config, args.date, args.index, |list, id| {
        let removed = list.remove_event(id)?;
        tracing::info!(date = %args.date, event = %removed, "removed event");
        Ok(())
    })
}

fn print_day(list: &EventList) {
    for (index, event) in list.events().enumerate() {
        println!("{index} {event}");
    }
}

/// Runs the split command.
pub fn run_split(args: &SplitArgs, config: &Config) -> Result<()> {
    print_day(&split(args, config)?);
    Ok(())
}

/// Runs the move command.
pub fn run_move(args: &MoveArgs, config: &Config) -> Result<()> {
    print_day(&move_event(args, config)?);
    Ok(())
}

/// Runs the resize command.
pub fn run_resize(args: &ResizeArgs, config: &Config) -> Result<()> {
    print_day(&resize(args, config)?);
    Ok(())
}

/// Runs the remove command.
pub fn run_remove(args: &RemoveArgs, config: &Config) -> Result<()> {
    print_day(&remove(args, config)?);
    Ok(())
}
