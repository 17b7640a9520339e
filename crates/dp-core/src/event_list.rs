//! The canonically ordered event collection and its mutation operations.
//!
//! # Ordering
//!
//! Events are kept sorted by start ascending and, for equal starts, by end
//! descending, so the longer of two events starting together comes first.
//! Identical spans fall back to category and then name, which keeps the order
//! (and with it the flatten result) independent of insertion history.
//! The list re-sorts eagerly after every structural change; observers never see
//! another order between calls.
//!
//! # Identity
//!
//! Each event gets a stable [`EventId`] on insertion. Mutations address events
//! by ID, never by position, because positions change whenever the list is
//! re-sorted.
//!
//! # Thread Safety
//!
//! `EventList` is `Send` but carries no internal synchronization. A single
//! owner mutates a list at a time; wrap it in a `Mutex` to share it.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::EventError;
use crate::event::{Event, EventId, check_interval, shift};

/// Lower and upper limit an [`EventList`] may push events into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Bounds {
    /// The span of a calendar day, midnight to next midnight.
    pub fn day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.start <= event.start && event.end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) id: EventId,
    pub(crate) event: Event,
}

/// An ordered collection of events for a day or an arbitrary span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventList {
    pub(crate) entries: Vec<Entry>,
    next_id: u64,
    bounds: Option<Bounds>,
}

impl EventList {
    /// Creates an empty, unbounded list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list bounded to one calendar day.
    pub fn for_day(date: NaiveDate) -> Self {
        Self::with_bounds(Bounds::day(date))
    }

    pub fn with_bounds(bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub const fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(id, event)` pairs in canonical order.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (EventId, &Event)> + ExactSizeIterator + '_ {
        self.entries.iter().map(|entry| (entry.id, &entry.event))
    }

    /// Iterates over the events in canonical order.
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &Event> + ExactSizeIterator + '_ {
        self.entries.iter().map(|entry| &entry.event)
    }

    /// Returns the ID of the event at a canonical position.
    pub fn id_at(&self, index: usize) -> Option<EventId> {
        self.entries.get(index).map(|entry| entry.id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Inserts an event and returns its new ID.
    pub fn add_event(&mut self, event: Event) -> Result<EventId, EventError> {
        check_interval(event.start, event.end)?;
        let id = self.push(event);
        self.sort();
        Ok(id)
    }

    /// Removes an event, returning it.
    pub fn remove_event(&mut self, id: EventId) -> Result<Event, EventError> {
        let index = self.position(id)?;
        Ok(self.entries.remove(index).event)
    }

    pub fn get_event_by_id(&self, id: EventId) -> Option<&Event> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.event)
    }

    /// The first event in canonical order starting strictly after `instant`.
    pub fn get_next_event_after(&self, instant: NaiveDateTime) -> Option<(EventId, &Event)> {
        self.iter().find(|(_, event)| event.start > instant)
    }

    /// The first event in reverse canonical order ending strictly before `instant`.
    pub fn get_prev_event_before(&self, instant: NaiveDateTime) -> Option<(EventId, &Event)> {
        self.iter().rev().find(|(_, event)| event.end < instant)
    }

    /// Splits an event in two at `at`, returning the ID of the later half.
    ///
    /// Both halves keep the name and category of the original.
    pub fn split_event(&mut self, id: EventId, at: NaiveDateTime) -> Result<EventId, EventError> {
        let index = self.position(id)?;
        let original = &self.entries[index].event;
        if !(original.start < at && at < original.end) {
            return Err(EventError::OutOfRange {
                at,
                start: original.start,
                end: original.end,
            });
        }

        let tail = Event {
            start: at,
            end: original.end,
            name: original.name.clone(),
            category: original.category.clone(),
        };
        self.entries[index].event.end = at;
        let tail_id = self.push(tail);
        self.sort();
        Ok(tail_id)
    }

    /// Moves the end of an event by `delta`.
    pub fn resize_by(&mut self, id: EventId, delta: Duration) -> Result<(), EventError> {
        let index = self.position(id)?;
        let end = shift(self.entries[index].event.end, delta)?;
        self.set_end(index, end)
    }

    /// Sets the end of an event to exactly `end`.
    pub fn resize_to(&mut self, id: EventId, end: NaiveDateTime) -> Result<(), EventError> {
        let index = self.position(id)?;
        self.set_end(index, end)
    }

    /// Shifts an event by `delta`, keeping its duration.
    pub fn move_single_event_by(&mut self, id: EventId, delta: Duration) -> Result<(), EventError> {
        let index = self.position(id)?;
        let moved = shifted(&self.entries[index].event, delta)?;
        self.entries[index].event = moved;
        self.sort();
        Ok(())
    }

    /// Shifts an event so it starts exactly at `start`, keeping its duration.
    pub fn move_single_event_to(
        &mut self,
        id: EventId,
        start: NaiveDateTime,
    ) -> Result<(), EventError> {
        let index = self.position(id)?;
        let delta = start - self.entries[index].event.start;
        let moved = shifted(&self.entries[index].event, delta)?;
        self.entries[index].event = moved;
        self.sort();
        Ok(())
    }

    /// Shifts an event by `delta`, pushing neighbours out of the way.
    ///
    /// Every event in the direction of movement that would start (or end)
    /// closer than `min_gap` to an already moved event is shifted by the same
    /// `delta`, transitively. If the list is bounded and any moved event would
    /// leave the bounds, nothing moves and [`EventError::Blocked`] is returned.
    pub fn move_events_pushing_by(
        &mut self,
        id: EventId,
        delta: Duration,
        min_gap: Duration,
    ) -> Result<(), EventError> {
        let index = self.position(id)?;
        if delta.is_zero() {
            return Ok(());
        }

        let first = shifted(&self.entries[index].event, delta)?;
        let mut frontier = if delta > Duration::zero() {
            first.end
        } else {
            first.start
        };
        let mut moves = vec![(index, first)];

        if delta > Duration::zero() {
            for (other_index, entry) in self.entries.iter().enumerate().skip(index + 1) {
                if entry.event.start < shift(frontier, min_gap)? {
                    let pushed = shifted(&entry.event, delta)?;
                    frontier = frontier.max(pushed.end);
                    moves.push((other_index, pushed));
                }
            }
        } else {
            for (other_index, entry) in self.entries.iter().enumerate().take(index).rev() {
                if shift(entry.event.end, min_gap)? > frontier {
                    let pushed = shifted(&entry.event, delta)?;
                    frontier = frontier.min(pushed.start);
                    moves.push((other_index, pushed));
                }
            }
        }

        if let Some(bounds) = self.bounds {
            if let Some((blocked, _)) = moves.iter().find(|(_, event)| !bounds.contains(event)) {
                return Err(EventError::Blocked {
                    id: self.entries[*blocked].id,
                    lower: bounds.start,
                    upper: bounds.end,
                });
            }
        }

        tracing::trace!(%id, moved = moves.len(), "pushed events");
        for (other_index, event) in moves {
            self.entries[other_index].event = event;
        }
        self.sort();
        Ok(())
    }

    /// Returns true if the list is in canonical order.
    pub fn is_canonical(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].event.canonical_cmp(&pair[1].event).is_le())
    }

    pub(crate) fn push(&mut self, event: Event) -> EventId {
        let id = EventId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, event });
        id
    }

    pub(crate) fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.event.canonical_cmp(&b.event));
    }

    fn position(&self, id: EventId) -> Result<usize, EventError> {
        debug_assert!(self.is_canonical(), "event list lost canonical order");
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(EventError::NotFound(id))
    }

    fn set_end(&mut self, index: usize, end: NaiveDateTime) -> Result<(), EventError> {
        check_interval(self.entries[index].event.start, end)?;
        self.entries[index].event.end = end;
        self.sort();
        Ok(())
    }
}

impl FromIterator<Event> for EventList {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut list = Self::new();
        for event in iter {
            debug_assert!(event.end > event.start, "event {event} has no duration");
            list.push(event);
        }
        list.sort();
        list
    }
}

fn shifted(event: &Event, delta: Duration) -> Result<Event, EventError> {
    Ok(Event {
        start: shift(event.start, delta)?,
        end: shift(event.end, delta)?,
        ..event.clone()
    })
}
