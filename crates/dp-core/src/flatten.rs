//! Priority-driven overlap resolution.
//!
//! # Algorithm Summary
//!
//! Two adjacent cursors `current` and `next = current + 1` walk the list in
//! canonical order, which is re-established before every step:
//!
//! 1. `next` contained in `current`: a higher-priority `next` cuts a hole into
//!    `current` (the part after `next` becomes a new trailing event);
//!    otherwise `next` is dropped.
//! 2. `next` starts during `current` and runs past it: a higher-priority `next`
//!    truncates `current`; the same category merges both; otherwise `next` is
//!    trimmed to start where `current` ends.
//! 3. No overlap: both cursors advance.
//!
//! Zero-length leftovers are removed. Priority ties go to `current`.

use crate::event::Event;
use crate::event_list::EventList;
use crate::priority::PriorityProvider;

impl EventList {
    /// Resolves all overlaps in place so no two events share any instant.
    ///
    /// Use [`EventList::flattened`] to keep the stored list untouched.
    pub fn flatten<P: PriorityProvider + ?Sized>(&mut self, priorities: &P) {
        if self.entries.len() < 2 {
            return;
        }

        let mut current = 0;
        while current + 1 < self.entries.len() {
            self.sort();
            let next = current + 1;
            let cur = &self.entries[current].event;
            let nxt = &self.entries[next].event;
            let next_wins =
                priorities.priority_of(&nxt.category) > priorities.priority_of(&cur.category);

            if nxt.is_contained_in(cur) {
                if next_wins {
                    let remainder = Event {
                        start: nxt.end,
                        end: cur.end,
                        ..cur.clone()
                    };
                    self.entries[current].event.end = self.entries[next].event.start;
                    if remainder.end > remainder.start {
                        self.push(remainder);
                    }
                    current = self.advance_or_drop(current);
                } else {
                    tracing::trace!(dropped = %self.entries[next].event, "contained event loses");
                    self.entries.remove(next);
                }
            } else if nxt.starts_during(cur) {
                if next_wins {
                    self.entries[current].event.end = self.entries[next].event.start;
                    current = self.advance_or_drop(current);
                } else if nxt.category == cur.category {
                    self.entries[current].event.end = self.entries[next].event.end;
                    self.entries.remove(next);
                } else {
                    self.entries[next].event.start = self.entries[current].event.end;
                }
            } else {
                current = next;
            }
        }
        self.sort();
    }

    /// Returns a flattened deep copy, leaving `self` unchanged.
    pub fn flattened<P: PriorityProvider + ?Sized>(&self, priorities: &P) -> Self {
        let mut flat = self.clone();
        flat.flatten(priorities);
        flat
    }

    /// Removes `current` if truncation left it empty, otherwise steps past it.
    fn advance_or_drop(&mut self, current: usize) -> usize {
        let event = &self.entries[current].event;
        if event.end > event.start {
            return current + 1;
        }
        tracing::trace!(dropped = %event, "truncated to zero length");
        self.entries.remove(current);
        current
    }
}
