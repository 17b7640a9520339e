//! Summarize command: time spent per category over a date range.
//!
//! Every day is flattened on its own with the configured priorities, so
//! overlapping events never count twice, then totals are added across days.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use clap::Args;
use dp_core::Category;

use super::util::{category_matcher, format_duration, parse_date};
use crate::Config;

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// First day of the range.
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub from: NaiveDate,

    /// Last day of the range, inclusive.
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub til: NaiveDate,

    /// Only show categories whose full name matches this regex.
    #[arg(long)]
    pub category: Option<String>,

    /// Print durations as `Xh Ym` instead of minutes.
    #[arg(long, conflicts_with = "json")]
    pub human_readable: bool,

    /// Output as JSON (category to minutes).
    #[arg(long)]
    pub json: bool,
}

/// Totals sorted by category name, filtered by `pattern`.
fn select(
    totals: HashMap<Category, Duration>,
    pattern: Option<&str>,
) -> Result<BTreeMap<Category, Duration>> {
    let matcher = pattern.map(category_matcher).transpose()?;
    Ok(totals
        .into_iter()
        .filter(|(category, _)| matcher.as_ref().is_none_or(|m| m(category)))
        .collect())
}

fn format_summary(totals: &BTreeMap<Category, Duration>, human_readable: bool) -> String {
    totals
        .iter()
        .map(|(category, duration)| {
            let value = if human_readable {
                format_duration(*duration)
            } else {
                duration.num_minutes().to_string()
            };
            format!("{category} {value}\n")
        })
        .collect()
}

fn format_summary_json(totals: &BTreeMap<Category, Duration>) -> Result<String> {
    let minutes: BTreeMap<&str, i64> = totals
        .iter()
        .map(|(category, duration)| (category.as_str(), duration.num_minutes()))
        .collect();
    Ok(serde_json::to_string_pretty(&minutes)?)
}

fn summarize(args: &SummarizeArgs, config: &Config) -> Result<BTreeMap<Category, Duration>> {
    if args.til < args.from {
        bail!("--til ({}) is before --from ({})", args.til, args.from);
    }

    let days = config
        .store()
        .load_range(args.from, args.til)
        .with_context(|| format!("failed to load days {} to {}", args.from, args.til))?;
    tracing::debug!(days = days.len(), "summarizing");

    let totals = config
        .planner()
        .sum_up_many(days.iter().map(|(_, list)| list));
    select(totals, args.category.as_deref())
}

/// Runs the summarize command.
pub fn run(args: &SummarizeArgs, config: &Config) -> Result<()> {
    let totals = summarize(args, config)?;

    if args.json {
        println!("{}", format_summary_json(&totals)?);
    } else {
        print!("{}", format_summary(&totals, args.human_readable));
    }

    Ok(())
}
