//! Per-semester query facade.
//!
//! # Flow
//!
//! 1. Load the semester's events from the injected repository (once per query).
//! 2. Run the validation pass and log, but do not reject, suspicious events.
//! 3. Build whatever the query needs fresh (the index for free slots) and
//!    run the engine.
//!
//! Nothing is cached between queries, so a write to the repository is
//! visible to the very next call.

use log::{info, warn};

use crate::conflicts::{
    detect_conflicts, detect_conflicts_on_days, find_all_collisions, CollisionFilter,
};
use crate::error::Result;
use crate::index::ScheduleIndex;
use crate::models::{CollisionPair, ConflictRecord, Dimension, Event, ProposedSession};
use crate::repository::EventRepository;
use crate::slots::{FreeSlot, FreeSlotQuery};
use crate::validation::validate_events;

/// Timetable queries against a repository.
///
/// # Example
///
/// ```
/// use chrono::NaiveTime;
/// use u_timetable::models::{Event, ProposedSession, MONDAY};
/// use u_timetable::planner::Planner;
/// use u_timetable::repository::InMemoryRepository;
/// use u_timetable::slots::FreeSlotQuery;
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// let mut repo = InMemoryRepository::new();
/// repo.insert_events("2025-HT", vec![
///     Event::new("MA101", MONDAY, t(9), t(11)).with_group("MTBG").with_week(36),
/// ]);
///
/// let planner = Planner::new(repo);
/// let proposal = ProposedSession::new(MONDAY, t(10), t(12), 36).with_groups(["MTBG"]);
/// assert_eq!(planner.check_proposal("2025-HT", &proposal).unwrap().len(), 1);
///
/// let query = FreeSlotQuery::new(["MTBG"], 60)
///     .with_weeks([36])
///     .with_days([MONDAY])
///     .with_window(t(8), t(12));
/// let slots = planner.free_slots("2025-HT", &query).unwrap();
/// assert_eq!(slots.len(), 2); // 08:00 and 11:00
/// ```
#[derive(Debug, Clone)]
pub struct Planner<R> {
    repository: R,
}

impl<R: EventRepository> Planner<R> {
    /// Creates a planner over `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Mutable access to the underlying repository.
    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    /// Consumes the planner, returning the repository.
    pub fn into_inner(self) -> R {
        self.repository
    }

    /// Loads one semester's events and reports validation problems.
    pub fn load(&self, semester: &str) -> Result<Vec<Event>> {
        let events = self.repository.load_events_for_semester(semester)?;
        if let Err(errors) = validate_events(&events) {
            for e in &errors {
                warn!("Semester '{}': {}", semester, e.message);
            }
        }
        info!("Loaded {} events for semester '{}'", events.len(), semester);
        Ok(events)
    }

    /// Builds a fresh busy-interval index for a semester.
    pub fn schedule_index(&self, semester: &str) -> Result<ScheduleIndex> {
        let events = self.load(semester)?;
        Ok(ScheduleIndex::build(&events))
    }

    /// Existing sessions clashing with `proposal`.
    pub fn check_proposal(
        &self,
        semester: &str,
        proposal: &ProposedSession,
    ) -> Result<Vec<ConflictRecord>> {
        let events = self.load(semester)?;
        Ok(detect_conflicts(&events, proposal))
    }

    /// Existing sessions clashing with `proposal` placed on each of `days`.
    pub fn check_proposal_on_days<I>(
        &self,
        semester: &str,
        proposal: &ProposedSession,
        days: I,
    ) -> Result<Vec<ConflictRecord>>
    where
        I: IntoIterator<Item = u8>,
    {
        let events = self.load(semester)?;
        Ok(detect_conflicts_on_days(&events, proposal, days))
    }

    /// All double-bookings in a semester along `dimension`.
    pub fn collision_report(
        &self,
        semester: &str,
        dimension: Dimension,
        filter: &CollisionFilter,
    ) -> Result<Vec<CollisionPair>> {
        let events = self.load(semester)?;
        Ok(find_all_collisions(&events, dimension, filter))
    }

    /// Free slots for `query` in a semester.
    ///
    /// The query is checked here, ahead of the repository load, so a
    /// malformed query fails without touching storage.
    /// [`ScheduleIndex::find_free_slots`] repeats the check for direct
    /// callers of the index.
    pub fn free_slots(&self, semester: &str, query: &FreeSlotQuery) -> Result<Vec<FreeSlot>> {
        query.validate()?;
        self.schedule_index(semester)?.find_free_slots(query)
    }
}
