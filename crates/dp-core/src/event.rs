//! Named, categorized time intervals.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EventError, ParseError};
use crate::types::{Category, validate_name};

/// Stable identity of an event inside an [`EventList`](crate::EventList).
///
/// IDs are assigned by the list on insertion and survive re-sorting, so callers
/// can keep "the selected event" across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric ID.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named, categorized half-open interval `[start, end)`.
///
/// `end > start` holds for every value of this type. Deserialization goes
/// through [`Event::new`] and rejects values that break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    pub(crate) start: NaiveDateTime,
    pub(crate) end: NaiveDateTime,
    pub(crate) name: String,
    pub(crate) category: Category,
}

/// Unchecked serde form of [`Event`].
#[derive(Serialize, Deserialize)]
struct RawEvent {
    start: NaiveDateTime,
    end: NaiveDateTime,
    name: String,
    category: Category,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end, raw.name, raw.category)
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        Self {
            start: event.start,
            end: event.end,
            name: event.name,
            category: event.category,
        }
    }
}

impl Event {
    /// Creates an event, rejecting intervals without positive duration.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        name: impl Into<String>,
        category: Category,
    ) -> Result<Self, EventError> {
        check_interval(start, end)?;
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            start,
            end,
            name,
            category,
        })
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn category(&self) -> &Category {
        &self.category
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True iff `other.start <= self.start < other.end`.
    pub fn starts_during(&self, other: &Self) -> bool {
        other.start <= self.start && self.start < other.end
    }

    /// True iff `self` starts during `other` and does not end after it.
    ///
    /// An event with the same start and end as `other` is contained in it.
    pub fn is_contained_in(&self, other: &Self) -> bool {
        self.starts_during(other) && self.end <= other.end
    }

    /// True iff the two intervals share any instant.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Canonical list order: start ascending, then end descending.
    ///
    /// Identical spans are ordered by category, then name, so the order never
    /// depends on insertion history.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.end.cmp(&self.end))
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.name.cmp(&other.name))
    }

    /// Parses a `<start>|<end>|<category>|<name>` line belonging to `date`.
    ///
    /// Times are `HH:MM` offsets from midnight of `date`; hours past 23 reach
    /// into the following day, so `24:00` is the next midnight. The name is the
    /// remainder of the line and may itself contain `|`.
    pub fn from_line(line: &str, date: NaiveDate) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.splitn(4, '|').collect();
        let &[start, end, category, name] = fields.as_slice() else {
            return Err(ParseError::FieldCount(fields.len()));
        };

        let start = parse_clock(start, date)?;
        let end = parse_clock(end, date)?;
        let category = Category::new(category).map_err(EventError::from)?;

        Ok(Self::new(start, end, name, category)?)
    }

    /// Renders the event as a day file line relative to the date it starts on.
    pub fn to_line(&self) -> String {
        let date = self.start.date();
        format!(
            "{}|{}|{}|{}",
            format_clock(self.start, date),
            format_clock(self.end, date),
            self.category,
            self.name
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.start.date();
        write!(
            f,
            "{}-{} {}",
            format_clock(self.start, date),
            format_clock(self.end, date),
            self.category
        )?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        Ok(())
    }
}

pub(crate) fn check_interval(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), EventError> {
    if end <= start {
        return Err(EventError::InvalidInterval { start, end });
    }
    Ok(())
}

/// Shifts an instant, reporting overflow instead of panicking.
pub(crate) fn shift(instant: NaiveDateTime, delta: Duration) -> Result<NaiveDateTime, EventError> {
    instant
        .checked_add_signed(delta)
        .ok_or(EventError::Overflow)
}

/// Formats `instant` as `HH:MM` minutes past midnight of `date`.
///
/// Seconds are truncated. Instants on later days render with hours past 23.
pub fn format_clock(instant: NaiveDateTime, date: NaiveDate) -> String {
    let minutes = (instant - date.and_time(NaiveTime::MIN)).num_minutes();
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Formats a duration as `HH:MM`, flooring to whole minutes.
pub fn format_duration_clock(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parses an `HH:MM` offset from midnight of `date`.
pub fn parse_clock(value: &str, date: NaiveDate) -> Result<NaiveDateTime, ParseError> {
    let invalid = || ParseError::Time(value.to_string());

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || minutes.len() != 2 || !all_digits(minutes) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    let offset = Duration::minutes(i64::from(hours) * 60 + i64::from(minutes));
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(offset)
        .ok_or_else(invalid)
}
