//! Core domain logic for the day planner.
//!
//! This crate contains the event timeline engine:
//! - Events: named, categorized intervals and their day-file line format
//! - Event lists: canonical ordering, identity, and editing operations
//! - Flattening: priority-driven overlap resolution
//! - Aggregation: category totals and timesheet entries

mod aggregate;
pub mod error;
pub mod event;
mod event_list;
mod flatten;
mod planner;
pub mod priority;
pub mod types;

pub use aggregate::TimesheetEntry;
pub use error::{EventError, ParseError};
pub use event::{Event, EventId, format_clock, format_duration_clock, parse_clock};
pub use event_list::{Bounds, EventList};
pub use planner::Planner;
pub use priority::{CategoryMatcher, CategoryPriorities, PriorityProvider};
pub use types::{Category, ValidationError};
