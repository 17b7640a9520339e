//! Error types surfaced by the event timeline engine.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::event::EventId;
use crate::types::ValidationError;

/// Errors returned by event construction and [`EventList`](crate::EventList) operations.
///
/// Every failing operation leaves the list exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The interval would not have a positive duration.
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// No event with this ID is in the list.
    #[error("event {0} not found")]
    NotFound(EventId),

    /// A split point was not strictly inside the event.
    #[error("split point {at} is not strictly inside {start} - {end}")]
    OutOfRange {
        at: NaiveDateTime,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Matched timesheet events do not all fall on the same calendar day.
    #[error("matched events cross a day boundary ({first} to {last})")]
    CrossesDayBoundary { first: NaiveDate, last: NaiveDate },

    /// A cascading push would move an event outside the list bounds.
    #[error("event {id} cannot be pushed outside {lower} - {upper}")]
    Blocked {
        id: EventId,
        lower: NaiveDateTime,
        upper: NaiveDateTime,
    },

    /// Shifting an instant left the representable date range.
    #[error("time arithmetic overflowed")]
    Overflow,

    /// A field of the event failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors from parsing the `<start>|<end>|<category>|<name>` line format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line did not have four `|`-separated fields.
    #[error("expected 4 '|'-separated fields, found {0}")]
    FieldCount(usize),

    /// A timestamp field was not `HH:MM`.
    #[error("invalid time {0:?}, expected HH:MM")]
    Time(String),

    /// The fields parsed but do not describe a valid event.
    #[error(transparent)]
    Event(#[from] EventError),
}
