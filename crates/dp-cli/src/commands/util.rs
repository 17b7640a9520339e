//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use dp_core::{Category, EventId, EventList};
use regex::Regex;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a date as `YYYY-MM-DD`, `today`, `yesterday` or `tomorrow`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    parse_date_from(s, Local::now().date_naive())
}

fn parse_date_from(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date = match s.trim() {
        "today" => Some(today),
        "yesterday" => today.pred_opt(),
        "tomorrow" => today.succ_opt(),
        other => {
            return NaiveDate::parse_from_str(other, DATE_FORMAT).with_context(|| {
                format!("Invalid date: {other}. Use YYYY-MM-DD, today, yesterday or tomorrow")
            });
        }
    };
    date.context("date out of range")
}

/// Parses an `HH:MM` time on `date`; hours past 23 reach into the next day.
pub fn parse_time(s: &str, date: NaiveDate) -> Result<NaiveDateTime> {
    dp_core::parse_clock(s.trim(), date).with_context(|| format!("Invalid time: {s}. Use HH:MM"))
}

/// Converts a user-supplied minute count, rejecting values chrono cannot hold.
pub fn minutes(value: i64, flag: &str) -> Result<Duration> {
    Duration::try_minutes(value).with_context(|| format!("{flag} {value} minutes is out of range"))
}

/// Compiles a category filter. The pattern must match the whole name.
pub fn category_matcher(pattern: &str) -> Result<impl Fn(&Category) -> bool + use<>> {
    let regex = Regex::new(&format!("^(?:{pattern})$"))
        .with_context(|| format!("invalid category pattern: {pattern}"))?;
    Ok(move |category: &Category| regex.is_match(category.as_str()))
}

/// Resolves a 0-based position in canonical order to an event ID.
pub fn event_at(list: &EventList, index: usize, date: NaiveDate) -> Result<EventId> {
    list.id_at(index).with_context(|| {
        format!(
            "no event at index {index} on {date} ({} events)",
            list.len()
        )
    })
}

/// Formats a duration as `Xh Ym`, or `Ym` below one hour.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
