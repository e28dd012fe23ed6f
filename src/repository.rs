//! Event storage seam.
//!
//! The engine never reaches for storage on its own. Callers inject an
//! [`EventRepository`] and the [`Planner`](crate::planner::Planner) asks
//! it for one semester's events per query.
//!
//! [`InMemoryRepository`] keeps events per semester in memory. It is the
//! default backend for tests and small tools; a database-backed store
//! only has to implement the trait.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};

use crate::error::Result;
use crate::ingest::{events_from_rows, RawEventRow};
use crate::models::Event;

/// Source of normalised events, keyed by semester.
pub trait EventRepository: Send + Sync {
    /// All events of `semester`. An unknown semester yields an empty list.
    fn load_events_for_semester(&self, semester: &str) -> Result<Vec<Event>>;
}

/// In-memory event store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    semesters: BTreeMap<String, Vec<Event>>,
}

impl InMemoryRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends events to `semester`.
    pub fn insert_events(
        &mut self,
        semester: impl Into<String>,
        events: impl IntoIterator<Item = Event>,
    ) {
        let semester = semester.into();
        let bucket = self.semesters.entry(semester.clone()).or_default();
        let before = bucket.len();
        bucket.extend(events);
        debug!("Stored {} events for semester '{}'", bucket.len() - before, semester);
    }

    /// Parses and appends raw rows to `semester`.
    ///
    /// Nothing is stored when any row fails to parse.
    pub fn insert_rows(
        &mut self,
        semester: impl Into<String>,
        rows: &[RawEventRow],
    ) -> Result<usize> {
        let events = events_from_rows(rows)?;
        let count = events.len();
        self.insert_events(semester, events);
        Ok(count)
    }

    /// Known semesters, sorted.
    pub fn semesters(&self) -> Vec<&str> {
        self.semesters.keys().map(String::as_str).collect()
    }

    /// Every program token across all semesters, sorted.
    pub fn program_tokens(&self) -> BTreeSet<&str> {
        self.semesters
            .values()
            .flatten()
            .flat_map(|ev| ev.groups.iter().map(String::as_str))
            .collect()
    }

    /// Total number of stored events.
    pub fn len(&self) -> usize {
        self.semesters.values().map(Vec::len).sum()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops a semester. Returns the number of events removed.
    pub fn remove_semester(&mut self, semester: &str) -> usize {
        let removed = self.semesters.remove(semester).map_or(0, |v| v.len());
        info!("Removed semester '{}' ({} events)", semester, removed);
        removed
    }

    /// Drops every event of a course (case-insensitive) in all semesters.
    pub fn remove_course(&mut self, course: &str) -> usize {
        let course = course.trim();
        self.retain(|ev| !ev.course.eq_ignore_ascii_case(course))
    }

    /// Drops every event serving `program` in all semesters.
    pub fn remove_program(&mut self, program: &str) -> usize {
        let program = program.trim().to_uppercase();
        self.retain(|ev| !ev.groups.contains(&program))
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.semesters.clear();
    }

    fn retain(&mut self, mut keep: impl FnMut(&Event) -> bool) -> usize {
        let mut removed = 0;
        for events in self.semesters.values_mut() {
            let before = events.len();
            events.retain(|ev| keep(ev));
            removed += before - events.len();
        }
        self.semesters.retain(|_, events| !events.is_empty());
        info!("Removed {} events", removed);
        removed
    }
}

impl EventRepository for InMemoryRepository {
    fn load_events_for_semester(&self, semester: &str) -> Result<Vec<Event>> {
        Ok(self.semesters.get(semester).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{hm, MONDAY, TUESDAY};

    fn repo() -> InMemoryRepository {
        let mut repo = InMemoryRepository::new();
        repo.insert_events(
            "2025-HT",
            vec![
                Event::new("MA101", MONDAY, hm(9, 0), hm(11, 0))
                    .with_groups(["MTBG", "NGMV"])
                    .with_week(36),
                Event::new("FY201", TUESDAY, hm(9, 0), hm(11, 0))
                    .with_group("FYSK")
                    .with_week(36),
            ],
        );
        repo.insert_events(
            "2026-VT",
            vec![Event::new("ma101", MONDAY, hm(13, 0), hm(15, 0))
                .with_group("MTBG")
                .with_week(4)],
        );
        repo
    }

    #[test]
    fn test_load_by_semester() {
        let repo = repo();
        assert_eq!(repo.load_events_for_semester("2025-HT").unwrap().len(), 2);
        assert_eq!(repo.load_events_for_semester("2026-VT").unwrap().len(), 1);
        assert!(repo.load_events_for_semester("1999-HT").unwrap().is_empty());
        assert_eq!(repo.semesters(), vec!["2025-HT", "2026-VT"]);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_program_tokens() {
        let repo = repo();
        let tokens: Vec<&str> = repo.program_tokens().into_iter().collect();
        assert_eq!(tokens, vec!["FYSK", "MTBG", "NGMV"]);
    }

    #[test]
    fn test_remove_course_case_insensitive() {
        let mut repo = repo();
        assert_eq!(repo.remove_course(" MA101 "), 2);
        assert_eq!(repo.semesters(), vec!["2025-HT"]);
    }

    #[test]
    fn test_remove_program_and_semester() {
        let mut repo = repo();
        assert_eq!(repo.remove_program("mtbg"), 2);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.remove_semester("2025-HT"), 1);
        assert!(repo.is_empty());
        assert_eq!(repo.remove_semester("2025-HT"), 0);
    }

    #[test]
    fn test_insert_rows_is_all_or_nothing() {
        let mut repo = InMemoryRepository::new();
        let good = RawEventRow {
            course: "A".into(),
            groups: "mtbg".into(),
            day: "ons".into(),
            start: "8".into(),
            end: "10".into(),
            weeks: "36-37".into(),
            teacher: "lund".into(),
        };
        let bad = RawEventRow {
            start: "late".into(),
            ..good.clone()
        };

        assert!(repo.insert_rows("2025-HT", &[good.clone(), bad]).is_err());
        assert!(repo.is_empty());

        assert_eq!(repo.insert_rows("2025-HT", &[good]).unwrap(), 1);
        let events = repo.load_events_for_semester("2025-HT").unwrap();
        assert!(events[0].teachers.contains("LUND"));
    }

    #[test]
    fn test_clear() {
        let mut repo = repo();
        repo.clear();
        assert!(repo.semesters().is_empty());
    }
}
