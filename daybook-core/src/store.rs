//! Date-keyed event store backed by a single JSON file.
//!
//! The file is one JSON object mapping `YYYY-MM-DD` to an array of events.
//! Every mutation rewrites the whole file; the in-memory map is only replaced
//! once the write succeeded.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::ops::Bound;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, parse_date, parse_description, parse_time};
use crate::month::YearMonth;

type EventMap = BTreeMap<NaiveDate, Vec<Event>>;

/// Events grouped by date, persisted to `path`.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
    events: EventMap,
}

impl EventStore {
    /// An empty store that will persist to `path`. Nothing is read or written.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        EventStore {
            path: path.into(),
            events: EventMap::new(),
        }
    }

    /// Load the store from `path`.
    ///
    /// A missing file gives an empty store. So does a file that is not valid
    /// UTF-8 JSON or doesn't have the expected shape: that case is logged as a
    /// warning and otherwise ignored, and the broken file is left on disk
    /// until the next save overwrites it.
    pub fn load(path: impl Into<PathBuf>) -> DaybookResult<Self> {
        let path = path.into();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "events file not found, starting empty");
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(DaybookError::persistence(path, e)),
        };

        let events = match serde_json::from_slice::<EventMap>(&bytes) {
            Ok(events) => events,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "events file is corrupt, starting with an empty store"
                );
                EventMap::new()
            }
        };

        // Older files may carry empty lists; they are not valid keys here.
        let events: EventMap = events.into_iter().filter(|(_, list)| !list.is_empty()).collect();

        debug!(
            path = %path.display(),
            dates = events.len(),
            "loaded events file"
        );

        Ok(EventStore { path, events })
    }

    /// Write the whole store to its file.
    pub fn save(&self) -> DaybookResult<()> {
        write_events(&self.path, &self.events)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validate and append an event, then persist.
    ///
    /// `time` may be blank. Returns the events now stored under `date`.
    pub fn add_event(&mut self, date: &str, time: &str, description: &str) -> DaybookResult<&[Event]> {
        let description = parse_description(description)?;
        let date = parse_date(date)?;
        let time = parse_time(time)?;

        let mut updated = self.events.clone();
        updated.entry(date).or_default().push(Event::new(time, description));
        self.commit(updated)?;

        debug!(%date, "added event");
        Ok(self.list_events(date))
    }

    /// Remove the event at `index` under `date`, then persist.
    ///
    /// The date disappears from the store when its last event goes.
    pub fn delete_event(&mut self, date: NaiveDate, index: usize) -> DaybookResult<Event> {
        let mut updated = self.events.clone();

        let list = updated
            .get_mut(&date)
            .ok_or_else(|| DaybookError::NotFound(format!("No events on {}", date)))?;

        if index >= list.len() {
            return Err(DaybookError::NotFound(format!(
                "No event #{} on {} ({} event{})",
                index,
                date,
                list.len(),
                if list.len() == 1 { "" } else { "s" }
            )));
        }

        let removed = list.remove(index);
        if list.is_empty() {
            updated.remove(&date);
        }

        self.commit(updated)?;

        debug!(%date, index, "deleted event");
        Ok(removed)
    }

    /// Persist `updated` and only then make it the current state.
    fn commit(&mut self, updated: EventMap) -> DaybookResult<()> {
        write_events(&self.path, &updated)?;
        self.events = updated;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Events on `date` in insertion order.
    pub fn list_events(&self, date: NaiveDate) -> &[Event] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dates with at least one event, ascending.
    pub fn all_dates(&self) -> Vec<NaiveDate> {
        self.events.keys().copied().collect()
    }

    /// Case-insensitive substring search over descriptions.
    ///
    /// Results come in date order, then insertion order within a date.
    pub fn search(&self, query: &str) -> Vec<(NaiveDate, &Event)> {
        let needle = query.to_lowercase();
        self.iter().filter(|(_, event)| event.matches(&needle)).collect()
    }

    /// Every event falling in `month`.
    pub fn events_in_month(&self, month: YearMonth) -> Vec<(NaiveDate, &Event)> {
        let first = Bound::Included(month.first_day());
        let last = match month.next() {
            Ok(next) => Bound::Excluded(next.first_day()),
            Err(_) => Bound::Unbounded,
        };
        self.events
            .range((first, last))
            .flat_map(|(date, list)| list.iter().map(move |event| (*date, event)))
            .collect()
    }

    /// Events from `from` (inclusive) over the next `days` days.
    pub fn upcoming(&self, from: NaiveDate, days: u32) -> Vec<(NaiveDate, &Event)> {
        let until = match from.checked_add_signed(Duration::days(i64::from(days))) {
            Some(until) => Bound::Excluded(until),
            None => Bound::Unbounded,
        };
        self.events
            .range((Bound::Included(from), until))
            .flat_map(|(date, list)| list.iter().map(move |event| (*date, event)))
            .collect()
    }

    /// All events in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &Event)> {
        self.events
            .iter()
            .flat_map(|(date, list)| list.iter().map(move |event| (*date, event)))
    }

    /// Total number of events.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Serialize `events` and atomically replace the file at `path`.
fn write_events(path: &Path, events: &EventMap) -> DaybookResult<()> {
    let content = serde_json::to_string_pretty(events)
        .map_err(|e| DaybookError::Serialization(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| DaybookError::persistence(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| DaybookError::persistence(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| DaybookError::persistence(path, e))?;
    tmp.persist(path)
        .map_err(|e| DaybookError::persistence(path, e.error))?;

    debug!(path = %path.display(), dates = events.len(), "saved events file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveTime};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_in(dir: &TempDir) -> EventStore {
        EventStore::load(dir.path().join("calendar_events.json")).unwrap()
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert!(store.all_dates().is_empty());
    }

    #[test]
    fn corrupt_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calendar_events.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = EventStore::load(&path).unwrap();
        assert!(store.is_empty());
        // left alone until the next save
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn non_utf8_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calendar_events.json");
        let garbage = [0xff, 0xfe, b'{', 0x80];
        std::fs::write(&path, garbage).unwrap();

        let store = EventStore::load(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(std::fs::read(&path).unwrap(), garbage);
    }

    #[test]
    fn wrong_shape_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calendar_events.json");
        std::fs::write(&path, r#"{"2024-03-01": "not a list"}"#).unwrap();

        assert!(EventStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn add_appends_with_given_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let day = date(2024, 3, 1);

        store.add_event("2024-03-01", "", "Breakfast").unwrap();
        let before = store.list_events(day).len();

        let list = store.add_event("2024-03-01", "09:30", "Team sync").unwrap();
        assert_eq!(list.len(), before + 1);

        let added = list.last().unwrap();
        assert_eq!(added.time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(added.description, "Team sync");
        assert!(added.created_at.year() >= 2024);
    }

    #[test]
    fn add_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "", "Written").unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.list_events(date(2024, 3, 1))[0].description, "Written");
    }

    #[test]
    fn duplicates_are_allowed() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "10:00", "Coffee").unwrap();
        store.add_event("2024-03-01", "10:00", "Coffee").unwrap();
        assert_eq!(store.list_events(date(2024, 3, 1)).len(), 2);
    }

    #[test]
    fn empty_description_is_rejected_without_change() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "", "Existing").unwrap();

        let err = store.add_event("2024-03-01", "10:00", "   ").unwrap_err();
        assert!(matches!(err, DaybookError::Validation(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store_in(&dir).len(), 1);
    }

    #[test]
    fn bad_date_or_time_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert!(matches!(
            store.add_event("2024-13-01", "", "Nope"),
            Err(DaybookError::Validation(_))
        ));
        assert!(matches!(
            store.add_event("2024-03-01", "9am", "Nope"),
            Err(DaybookError::Validation(_))
        ));
        assert!(store.is_empty());
        assert!(!dir.path().join("calendar_events.json").exists());
    }

    #[test]
    fn deleting_last_event_removes_date() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "", "Only one").unwrap();
        store.add_event("2024-03-02", "", "Other day").unwrap();

        let removed = store.delete_event(date(2024, 3, 1), 0).unwrap();
        assert_eq!(removed.description, "Only one");
        assert_eq!(store.all_dates(), vec![date(2024, 3, 2)]);
        assert_eq!(store_in(&dir).all_dates(), vec![date(2024, 3, 2)]);
    }

    #[test]
    fn delete_keeps_order_of_remaining_events() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for name in ["a", "b", "c"] {
            store.add_event("2024-03-01", "", name).unwrap();
        }

        store.delete_event(date(2024, 3, 1), 1).unwrap();
        let names: Vec<_> = store
            .list_events(date(2024, 3, 1))
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn delete_reports_missing_date_and_index() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "", "Here").unwrap();

        assert!(matches!(
            store.delete_event(date(2024, 3, 2), 0),
            Err(DaybookError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_event(date(2024, 3, 1), 1),
            Err(DaybookError::NotFound(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "", "First").unwrap();
        store.add_event("2024-03-01", "08:00", "Second").unwrap();
        store.add_event("2023-12-31", "23:59", "New year's eve").unwrap();
        store.save().unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.all_dates(), store.all_dates());
        for day in store.all_dates() {
            assert_eq!(reloaded.list_events(day), store.list_events(day));
        }
    }

    #[test]
    fn reads_the_documented_file_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calendar_events.json");
        std::fs::write(
            &path,
            r#"{
                "2024-03-01": [
                    {"time": "", "description": "Team sync", "created_at": "2024-02-20 10:00:00"},
                    {"time": "14:15", "description": "Review", "created_at": "2024-02-20 10:01:00"}
                ],
                "2024-01-05": []
            }"#,
        )
        .unwrap();

        let store = EventStore::load(&path).unwrap();
        assert_eq!(store.all_dates(), vec![date(2024, 3, 1)]);
        assert_eq!(store.list_events(date(2024, 3, 1))[1].time_label(), "14:15");
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be makes the rename fail
        let path = dir.path().join("calendar_events.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let mut store = EventStore::empty(&path);
        let err = store.add_event("2024-03-01", "", "Lost").unwrap_err();
        assert!(matches!(err, DaybookError::Persistence { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-03-01", "", "Team sync").unwrap();
        store.add_event("2024-03-02", "", "Lunch").unwrap();

        let hits = store.search("team");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, date(2024, 3, 1));
        assert_eq!(hits[0].1.description, "Team sync");
        assert_eq!(store.search("TEAM").len(), 1);
    }

    #[test]
    fn search_orders_by_date_then_insertion() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event("2024-05-01", "", "call mum").unwrap();
        store.add_event("2024-01-01", "", "Call bank").unwrap();
        store.add_event("2024-01-01", "", "call plumber").unwrap();

        let hits: Vec<_> = store
            .search("call")
            .into_iter()
            .map(|(d, e)| (d, e.description.clone()))
            .collect();
        assert_eq!(
            hits,
            vec![
                (date(2024, 1, 1), "Call bank".to_string()),
                (date(2024, 1, 1), "call plumber".to_string()),
                (date(2024, 5, 1), "call mum".to_string()),
            ]
        );
    }

    #[test]
    fn all_dates_are_ascending() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for d in ["2024-12-01", "2023-01-15", "2024-02-29"] {
            store.add_event(d, "", "x").unwrap();
        }
        assert_eq!(
            store.all_dates(),
            vec![date(2023, 1, 15), date(2024, 2, 29), date(2024, 12, 1)]
        );
    }

    #[test]
    fn month_and_upcoming_windows() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for d in ["2024-01-31", "2024-02-01", "2024-02-29", "2024-03-01"] {
            store.add_event(d, "", d).unwrap();
        }

        let feb = store.events_in_month(YearMonth::new(2024, 2).unwrap());
        assert_eq!(feb.len(), 2);
        assert_eq!(feb[0].0, date(2024, 2, 1));
        assert_eq!(feb[1].0, date(2024, 2, 29));

        // 27, 28, 29: three days ending on the leap day
        let three = store.upcoming(date(2024, 2, 27), 3);
        assert_eq!(three.len(), 1);
        assert_eq!(three[0].0, date(2024, 2, 29));

        let four = store.upcoming(date(2024, 2, 27), 4);
        assert_eq!(four.len(), 2);
        assert_eq!(four[1].0, date(2024, 3, 1));

        assert!(store.upcoming(date(2024, 2, 27), 0).is_empty());
    }

    #[test]
    fn events_in_last_representable_month() {
        let dir = TempDir::new().unwrap();
        let mut events = EventMap::new();
        events.insert(NaiveDate::MAX, vec![Event::new(None, "End of time")]);
        let store = EventStore {
            path: dir.path().join("calendar_events.json"),
            events,
        };

        let last = store.events_in_month(YearMonth::of(NaiveDate::MAX));
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].1.description, "End of time");
        assert_eq!(store.upcoming(NaiveDate::MAX, 7).len(), 1);
    }
}
