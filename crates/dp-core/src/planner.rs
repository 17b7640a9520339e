//! Aggregation service bound to one priority configuration.

use std::collections::HashMap;

use chrono::Duration;

use crate::aggregate::TimesheetEntry;
use crate::error::EventError;
use crate::event_list::EventList;
use crate::priority::{CategoryMatcher, PriorityProvider};
use crate::types::Category;

/// Wraps a [`PriorityProvider`] so callers pass priorities once, not per call.
#[derive(Debug, Clone, Default)]
pub struct Planner<P> {
    priorities: P,
}

impl<P: PriorityProvider> Planner<P> {
    pub const fn new(priorities: P) -> Self {
        Self { priorities }
    }

    pub const fn priorities(&self) -> &P {
        &self.priorities
    }

    /// Non-overlapping copy of `list`.
    pub fn flatten(&self, list: &EventList) -> EventList {
        list.flattened(&self.priorities)
    }

    pub fn sum_up_by_category(&self, list: &EventList) -> HashMap<Category, Duration> {
        list.sum_up_by_category(&self.priorities)
    }

    /// Category totals over several lists, e.g. the days of a week.
    pub fn sum_up_many<'a, I>(&self, lists: I) -> HashMap<Category, Duration>
    where
        I: IntoIterator<Item = &'a EventList>,
    {
        let mut totals: HashMap<Category, Duration> = HashMap::new();
        for list in lists {
            for (category, duration) in self.sum_up_by_category(list) {
                *totals.entry(category).or_insert_with(Duration::zero) += duration;
            }
        }
        totals
    }

    pub fn timesheet_entry<M: CategoryMatcher + ?Sized>(
        &self,
        list: &EventList,
        matcher: &M,
    ) -> Result<Option<TimesheetEntry>, EventError> {
        list.get_timesheet_entry(matcher, &self.priorities)
    }
}
