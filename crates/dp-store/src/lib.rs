//! Storage layer for the day planner.
//!
//! Every day lives in its own plain-text file under `<data_dir>/days/`, named
//! `YYYY-MM-DD`. Each line holds one event:
//!
//! ```text
//! 08:00|12:00|work|deep work on parser
//! 12:00|12:45|eating|lunch
//! ```
//!
//! Times are relative to the file's date; `24:00` is the following midnight.
//! A missing file is an empty day.
//!
//! # Thread Safety
//!
//! [`DayStore`] is `Sync`; distinct days can be loaded concurrently, which
//! [`DayStore::load_range`] does with `rayon`. Writes take an exclusive `fs2`
//! lock on `<data_dir>/days/.lock` so concurrent `dayplan` processes do not
//! interleave partial files. The returned [`EventList`]s are owned by the
//! caller and must be mutated from one thread at a time.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dp_core::{Event, EventError, EventList, ParseError};
use fs2::FileExt;
use rayon::prelude::*;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a day file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A line of a day file is malformed.
    #[error("{path}:{line_number}: {source}")]
    Parse {
        path: PathBuf,
        line_number: usize,
        #[source]
        source: ParseError,
    },
    /// An event cannot be stored in the file of the given day.
    #[error("event {event} does not start on {date}")]
    WrongDay { date: NaiveDate, event: String },
    /// The loaded events violate an engine invariant.
    #[error(transparent)]
    Event(#[from] EventError),
}

/// Day-file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct DayStore {
    days_dir: PathBuf,
}

impl DayStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            days_dir: data_dir.as_ref().join("days"),
        }
    }

    /// Path of the file holding `date`.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.days_dir.join(date.format(DATE_FORMAT).to_string())
    }

    /// Loads one day, bounded to that day.
    pub fn load_day(&self, date: NaiveDate) -> Result<EventList, StoreError> {
        let path = self.day_path(date);
        let mut list = EventList::for_day(date);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::trace!(%date, "no day file");
                return Ok(list);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event = Event::from_line(line, date).map_err(|source| StoreError::Parse {
                path: path.clone(),
                line_number: index + 1,
                source,
            })?;
            list.add_event(event)?;
        }

        tracing::debug!(%date, events = list.len(), "loaded day");
        Ok(list)
    }

    /// Writes a day in canonical order. An empty list removes the file.
    pub fn save_day(&self, date: NaiveDate, list: &EventList) -> Result<(), StoreError> {
        if let Some(event) = list.events().find(|e| e.start().date() != date) {
            return Err(StoreError::WrongDay {
                date,
                event: event.to_string(),
            });
        }

        fs::create_dir_all(&self.days_dir).map_err(|source| StoreError::Io {
            path: self.days_dir.clone(),
            source,
        })?;
        let _lock = self.lock()?;

        let path = self.day_path(date);
        if list.is_empty() {
            return match fs::remove_file(&path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => {
                    Err(StoreError::Io { path, source: err })
                }
                _ => Ok(()),
            };
        }

        let mut content = String::new();
        for event in list.events() {
            content.push_str(&event.to_line());
            content.push('\n');
        }
        fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(%date, events = list.len(), "saved day");
        Ok(())
    }

    /// Loads every day from `from` through `til` inclusive, in date order.
    ///
    /// Days are read in parallel; the first error aborts the whole range.
    pub fn load_range(
        &self,
        from: NaiveDate,
        til: NaiveDate,
    ) -> Result<Vec<(NaiveDate, EventList)>, StoreError> {
        let dates: Vec<NaiveDate> = from.iter_days().take_while(|date| *date <= til).collect();
        dates
            .par_iter()
            .map(|&date| self.load_day(date).map(|list| (date, list)))
            .collect()
    }

    /// Dates that currently have a day file, sorted ascending.
    pub fn stored_days(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let entries = match fs::read_dir(&self.days_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.days_dir.clone(),
                    source,
                });
            }
        };

        let mut days: Vec<NaiveDate> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name();
                NaiveDate::parse_from_str(name.to_str()?, DATE_FORMAT).ok()
            })
            .collect();
        days.sort_unstable();
        Ok(days)
    }

    fn lock(&self) -> Result<File, StoreError> {
        let path = self.days_dir.join(".lock");
        let file = File::create(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        FileExt::lock_exclusive(&file).map_err(|source| StoreError::Io { path, source })?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};
    use dp_core::{Bounds, Category};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn event(start: NaiveDateTime, end: NaiveDateTime, category: &str, name: &str) -> Event {
        Event::new(start, end, name, Category::new(category).unwrap()).unwrap()
    }

    #[test]
    fn missing_day_is_empty_and_bounded() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());

        let list = store.load_day(date()).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.bounds(), Some(Bounds::day(date())));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());
        let list: EventList = [
            event(at(12, 0), at(12, 45), "eating", "lunch"),
            event(at(8, 0), at(12, 0), "work", "parser | lexer"),
        ]
        .into_iter()
        .collect();

        store.save_day(date(), &list).unwrap();

        let content = fs::read_to_string(store.day_path(date())).unwrap();
        assert_eq!(
            content,
            "08:00|12:00|work|parser | lexer\n12:00|12:45|eating|lunch\n"
        );

        let loaded = store.load_day(date()).unwrap();
        let loaded: Vec<_> = loaded.events().cloned().collect();
        let original: Vec<_> = list.events().cloned().collect();
        assert_eq!(loaded, original);
    }

    #[test]
    fn load_reports_line_numbers() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());
        fs::create_dir_all(temp.path().join("days")).unwrap();
        fs::write(
            store.day_path(date()),
            "08:00|09:00|work|ok\n\n10:00|09:00|work|backwards\n",
        )
        .unwrap();

        let err = store.load_day(date()).unwrap_err();

        assert!(matches!(err, StoreError::Parse { line_number: 3, .. }));
    }

    #[test]
    fn saving_empty_day_removes_file() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());
        let mut list = EventList::for_day(date());
        let id = list
            .add_event(event(at(8, 0), at(9, 0), "work", "x"))
            .unwrap();
        store.save_day(date(), &list).unwrap();
        assert!(store.day_path(date()).exists());

        list.remove_event(id).unwrap();
        store.save_day(date(), &list).unwrap();

        assert!(!store.day_path(date()).exists());
        store.save_day(date(), &list).unwrap();
    }

    #[test]
    fn save_rejects_events_from_other_days() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());
        let list: EventList = [event(
            at(8, 0) + Duration::days(1),
            at(9, 0) + Duration::days(1),
            "work",
            "x",
        )]
        .into_iter()
        .collect();

        let err = store.save_day(date(), &list).unwrap_err();

        assert!(matches!(err, StoreError::WrongDay { .. }));
    }

    #[test]
    fn load_range_is_inclusive_and_ordered() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());
        let next = date().succ_opt().unwrap();
        let list: EventList = [event(
            next.and_hms_opt(8, 0, 0).unwrap(),
            next.and_hms_opt(9, 0, 0).unwrap(),
            "work",
            "x",
        )]
        .into_iter()
        .collect();
        store.save_day(next, &list).unwrap();

        let days = store
            .load_range(date(), date() + Duration::days(2))
            .unwrap();

        let summary: Vec<_> = days.iter().map(|(d, l)| (*d, l.len())).collect();
        assert_eq!(
            summary,
            vec![(date(), 0), (next, 1), (date() + Duration::days(2), 0)]
        );
        assert_eq!(store.stored_days().unwrap(), vec![next]);
    }

    #[test]
    fn empty_range_loads_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let store = DayStore::new(temp.path());

        let days = store
            .load_range(date(), date() - Duration::days(1))
            .unwrap();

        assert!(days.is_empty());
    }
}
