//! Category totals and timesheet entries derived from flattened event lists.

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::EventError;
use crate::event::{Event, format_clock, format_duration_clock};
use crate::event_list::{Bounds, EventList};
use crate::priority::{CategoryMatcher, PriorityProvider};
use crate::types::Category;

/// Working hours of one day for the matched categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimesheetEntry {
    /// Start of the first matched event.
    pub start: NaiveDateTime,
    /// Total gap time between consecutive matched events.
    pub break_duration: Duration,
    /// End of the last matched event.
    pub end: NaiveDateTime,
}

impl TimesheetEntry {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Time spent on matched events, excluding breaks.
    pub fn worked(&self) -> Duration {
        self.end - self.start - self.break_duration
    }

    /// Renders the `start,break,end` row, all fields as `HH:MM`.
    pub fn to_row(&self) -> String {
        format!(
            "{},{},{}",
            format_clock(self.start, self.date()),
            format_duration_clock(self.break_duration),
            format_clock(self.end, self.date())
        )
    }
}

impl fmt::Display for TimesheetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_row())
    }
}

impl EventList {
    /// Sums the flattened duration of every category.
    ///
    /// Overlapping events never count the same wall-clock time twice.
    pub fn sum_up_by_category<P: PriorityProvider + ?Sized>(
        &self,
        priorities: &P,
    ) -> HashMap<Category, Duration> {
        let mut sums: HashMap<Category, Duration> = HashMap::new();
        for event in self.flattened(priorities).events() {
            *sums.entry(event.category.clone()).or_insert_with(Duration::zero) += event.duration();
        }
        sums
    }

    /// Builds the timesheet entry for events whose category matches.
    ///
    /// Returns `Ok(None)` if no flattened event matches.
    pub fn get_timesheet_entry<M, P>(
        &self,
        matcher: &M,
        priorities: &P,
    ) -> Result<Option<TimesheetEntry>, EventError>
    where
        M: CategoryMatcher + ?Sized,
        P: PriorityProvider + ?Sized,
    {
        let flat = self.flattened(priorities);
        let mut matched = flat.events().filter(|e| matcher.matches(&e.category));

        let Some(first) = matched.next() else {
            return Ok(None);
        };
        let day = first.start.date();
        let day_end = Bounds::day(day).end;

        let mut last: &Event = first;
        let mut break_duration = Duration::zero();
        check_same_day(last, day, day_end)?;
        for event in matched {
            check_same_day(event, day, day_end)?;
            break_duration += event.start - last.end;
            last = event;
        }

        Ok(Some(TimesheetEntry {
            start: first.start,
            break_duration,
            end: last.end,
        }))
    }
}

fn check_same_day(event: &Event, day: NaiveDate, day_end: NaiveDateTime) -> Result<(), EventError> {
    if event.start.date() != day {
        return Err(EventError::CrossesDayBoundary {
            first: day,
            last: event.start.date(),
        });
    }
    if event.end > day_end {
        return Err(EventError::CrossesDayBoundary {
            first: day,
            last: event.end.date(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CategoryPriorities;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn category(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    fn event(start: NaiveDateTime, end: NaiveDateTime, name: &str) -> Event {
        Event::new(start, end, name, category(name)).unwrap()
    }

    fn priorities() -> CategoryPriorities {
        [(category("work"), 80), (category("eating"), 10)]
            .into_iter()
            .collect()
    }

    fn is_work(c: &Category) -> bool {
        c.as_str() == "work"
    }

    #[test]
    fn sum_single_event() {
        let list: EventList = [event(at(5, 50), at(6, 30), "eating")].into_iter().collect();

        let sums = list.sum_up_by_category(&priorities());

        assert_eq!(sums.len(), 1);
        assert_eq!(sums[&category("eating")], Duration::minutes(40));
    }

    #[test]
    fn sum_merges_overlapping_same_category() {
        let list: EventList = [event(at(1, 0), at(2, 0), "a"), event(at(1, 30), at(2, 30), "a")]
            .into_iter()
            .collect();

        let sums = list.sum_up_by_category(&priorities());

        assert_eq!(sums[&category("a")], Duration::minutes(90));
    }

    #[test]
    fn sum_never_double_counts() {
        let list: EventList = [
            event(at(12, 0), at(13, 0), "eating"),
            event(at(12, 25), at(12, 35), "work"),
            event(at(9, 0), at(10, 0), "work"),
        ]
        .into_iter()
        .collect();

        let sums = list.sum_up_by_category(&priorities());

        assert_eq!(sums[&category("eating")], Duration::minutes(50));
        assert_eq!(sums[&category("work")], Duration::minutes(70));
        let total: Duration = sums.values().copied().sum();
        assert_eq!(total, Duration::minutes(120));
    }

    #[test]
    fn sum_is_stable_under_reflattening() {
        let list: EventList = [
            event(at(8, 0), at(12, 0), "eating"),
            event(at(9, 0), at(10, 0), "work"),
            event(at(11, 0), at(13, 0), "a"),
        ]
        .into_iter()
        .collect();

        let flat = list.flattened(&priorities());
        assert_eq!(
            list.sum_up_by_category(&priorities()),
            flat.sum_up_by_category(&priorities())
        );
    }

    #[test]
    fn sum_of_empty_list_is_empty() {
        assert!(EventList::new().sum_up_by_category(&priorities()).is_empty());
    }

    #[test]
    fn timesheet_sums_gaps_between_matches() {
        let list: EventList = [
            event(at(8, 0), at(12, 0), "work"),
            event(at(12, 0), at(12, 45), "eating"),
            event(at(12, 45), at(15, 0), "work"),
            event(at(15, 30), at(17, 0), "work"),
        ]
        .into_iter()
        .collect();

        let entry = list
            .get_timesheet_entry(&is_work, &priorities())
            .unwrap()
            .unwrap();

        assert_eq!(entry.start, at(8, 0));
        assert_eq!(entry.end, at(17, 0));
        assert_eq!(entry.break_duration, Duration::minutes(75));
        assert_eq!(entry.worked(), Duration::minutes(465));
        assert_eq!(entry.to_row(), "08:00,01:15,17:00");
    }

    #[test]
    fn timesheet_uses_flattened_spans() {
        let list: EventList = [
            event(at(9, 0), at(11, 0), "work"),
            event(at(10, 0), at(12, 0), "work"),
            event(at(11, 30), at(13, 0), "eating"),
        ]
        .into_iter()
        .collect();

        let entry = list
            .get_timesheet_entry(&is_work, &priorities())
            .unwrap()
            .unwrap();

        assert_eq!(entry.to_row(), "09:00,00:00,12:00");
    }

    #[test]
    fn timesheet_without_matches_is_none() {
        let list: EventList = [event(at(9, 0), at(10, 0), "eating")].into_iter().collect();

        assert_eq!(list.get_timesheet_entry(&is_work, &priorities()), Ok(None));
    }

    #[test]
    fn timesheet_may_end_at_midnight() {
        let midnight = date().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();
        let list: EventList = [event(at(22, 0), midnight, "work")].into_iter().collect();

        let entry = list
            .get_timesheet_entry(&is_work, &priorities())
            .unwrap()
            .unwrap();
        assert_eq!(entry.to_row(), "22:00,00:00,24:00");
    }

    #[test]
    fn timesheet_rejects_multi_day_matches() {
        let next_day = date().succ_opt().unwrap();
        let list: EventList = [
            event(at(22, 0), at(23, 0), "work"),
            event(
                next_day.and_hms_opt(1, 0, 0).unwrap(),
                next_day.and_hms_opt(2, 0, 0).unwrap(),
                "work",
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            list.get_timesheet_entry(&is_work, &priorities()),
            Err(EventError::CrossesDayBoundary {
                first: date(),
                last: next_day,
            })
        );
    }
}
