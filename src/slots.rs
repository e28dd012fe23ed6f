//! Free-slot search.
//!
//! Enumerates every window of a requested length, inside an allowed
//! daily time window and weekday set, that is free for *all* queried
//! programs. Candidates start at the window start and advance by a fixed
//! granularity; there is no ranking beyond chronological order.
//!
//! # Busy-run merging
//! Busy intervals of the queried programs are merged into maximal runs
//! before scanning, and touching intervals (09:00–10:00, 10:00–11:00) are
//! merged into one run. This is a scan optimisation only. Candidates are
//! still rejected with the ordinary overlap test, so a slot ending exactly
//! when a run starts (or starting when it ends) stays free, just as
//! back-to-back sessions are not conflicts. Changing either rule changes
//! only its own path.
//!
//! # Configuration
//! [`FreeSlotQuery`] carries the search parameters with the defaults of
//! a teaching week (Mon–Fri, 08:00–18:00, 30-minute steps, 90-minute
//! sessions) and can be loaded from TOML:
//!
//! ```
//! use u_timetable::slots::FreeSlotQuery;
//!
//! let query = FreeSlotQuery::from_toml_str(r#"
//!     groups = ["MTBG"]
//!     weeks = [36, 37]
//!     duration_min = 60
//!     window_start = "09:00"
//! "#).unwrap();
//! assert_eq!(query.granularity_min, 30);
//! assert_eq!(query.days.len(), 5);
//! ```

use std::collections::BTreeSet;

use chrono::{Duration, NaiveTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::index::ScheduleIndex;
use crate::models::{
    format_hhmm, hhmm, minutes_from_midnight, minutes_from_midnight_ceil, time_from_minutes,
    weekday_label, TimeRange, FRIDAY, MONDAY,
};

/// Default session length (minutes).
pub const DEFAULT_DURATION_MIN: i64 = 90;
/// Default candidate step (minutes).
pub const DEFAULT_GRANULARITY_MIN: i64 = 30;

/// Parameters of a free-slot search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeSlotQuery {
    /// Programs that must all be free.
    pub groups: BTreeSet<String>,
    /// Required slot length (minutes).
    pub duration_min: i64,
    /// Candidate weeks.
    pub weeks: BTreeSet<u32>,
    /// Allowed weekdays.
    pub days: BTreeSet<u8>,
    /// Earliest slot start.
    #[serde(with = "hhmm")]
    pub window_start: NaiveTime,
    /// Latest slot end.
    #[serde(with = "hhmm")]
    pub window_end: NaiveTime,
    /// Step between candidate starts (minutes).
    pub granularity_min: i64,
}

impl Default for FreeSlotQuery {
    fn default() -> Self {
        Self {
            groups: BTreeSet::new(),
            duration_min: DEFAULT_DURATION_MIN,
            weeks: BTreeSet::new(),
            days: (MONDAY..=FRIDAY).collect(),
            window_start: NaiveTime::MIN + Duration::hours(8),
            window_end: NaiveTime::MIN + Duration::hours(18),
            granularity_min: DEFAULT_GRANULARITY_MIN,
        }
    }
}

impl FreeSlotQuery {
    /// Creates a query for `groups` needing `duration_min` minutes, with
    /// default days, window and granularity and no weeks.
    pub fn new<I, S>(groups: I, duration_min: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            duration_min,
            ..Self::default()
        }
    }

    /// Sets the candidate weeks.
    pub fn with_weeks(mut self, weeks: impl IntoIterator<Item = u32>) -> Self {
        self.weeks = weeks.into_iter().collect();
        self
    }

    /// Sets the allowed weekdays.
    pub fn with_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    /// Sets the daily window.
    pub fn with_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    /// Sets the step between candidate starts.
    pub fn with_granularity(mut self, granularity_min: i64) -> Self {
        self.granularity_min = granularity_min;
        self
    }

    /// Parses a query from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let query: Self = toml::from_str(s)?;
        query.validate()?;
        Ok(query)
    }

    /// Rejects malformed search parameters.
    ///
    /// # Errors
    /// `InvalidArgument` for a non-positive duration or granularity, or a
    /// window whose start is not before its end.
    pub fn validate(&self) -> Result<()> {
        if self.duration_min <= 0 {
            return Err(ScheduleError::invalid_argument(format!(
                "duration must be positive, got {} min",
                self.duration_min
            )));
        }
        if self.granularity_min <= 0 {
            return Err(ScheduleError::invalid_argument(format!(
                "granularity must be positive, got {} min",
                self.granularity_min
            )));
        }
        if self.window_start >= self.window_end {
            return Err(ScheduleError::invalid_argument(format!(
                "day window {}-{} is empty",
                format_hhmm(self.window_start),
                format_hhmm(self.window_end)
            )));
        }
        Ok(())
    }
}

/// A free window found by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FreeSlot {
    /// Week number.
    pub week: u32,
    /// Weekday.
    pub day: u8,
    /// Slot start.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Slot end.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl FreeSlot {
    /// The slot as a time range.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    /// Short weekday label.
    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.day)
    }
}

/// Merges ranges into maximal busy runs. Touching ranges are joined.
///
/// The input need not be sorted; the output is sorted and disjoint.
pub fn merge_busy_runs(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort();
    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    merged
}

impl ScheduleIndex {
    /// Merged busy runs of all `groups` in `week` on `day`.
    pub fn merged_busy<'a, I>(&self, groups: I, week: u32, day: u8) -> Vec<TimeRange>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let busy: Vec<TimeRange> = groups
            .into_iter()
            .flat_map(|g| self.busy(g, week, day).iter().copied())
            .collect();
        merge_busy_runs(busy)
    }

    /// Enumerates free slots for `query`.
    ///
    /// Iterates weeks ascending, then days ascending, then time of day
    /// ascending. Returns an empty list when nothing fits.
    ///
    /// Candidates fall on whole minutes: a window start with seconds is
    /// rounded up and a window end is rounded down.
    ///
    /// # Errors
    /// `InvalidArgument` when [`FreeSlotQuery::validate`] fails.
    pub fn find_free_slots(&self, query: &FreeSlotQuery) -> Result<Vec<FreeSlot>> {
        query.validate()?;

        let window_start = minutes_from_midnight_ceil(query.window_start);
        let window_end = minutes_from_midnight(query.window_end);
        let mut slots = Vec::new();

        if window_end - window_start < query.duration_min {
            debug!(
                "Free-slot search: {} min does not fit in {}-{}",
                query.duration_min,
                format_hhmm(query.window_start),
                format_hhmm(query.window_end)
            );
            return Ok(slots);
        }

        for &week in &query.weeks {
            for &day in &query.days {
                let busy = self.merged_busy(&query.groups, week, day);

                let mut s = window_start;
                while let Some(e) = s
                    .checked_add(query.duration_min)
                    .filter(|&e| e <= window_end)
                {
                    // Both ends lie inside the window, hence inside the day.
                    if let (Some(start), Some(end)) = (time_from_minutes(s), time_from_minutes(e)) {
                        let candidate = TimeRange::new(start, end);
                        if !busy.iter().any(|b| b.overlaps(&candidate)) {
                            slots.push(FreeSlot {
                                week,
                                day,
                                start,
                                end,
                            });
                        }
                    }
                    let Some(next) = s.checked_add(query.granularity_min) else {
                        break;
                    };
                    s = next;
                }
            }
        }

        debug!(
            "Free-slot search for {} groups over {} weeks x {} days: {} slots",
            query.groups.len(),
            query.weeks.len(),
            query.days.len(),
            slots.len()
        );
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{hm, Event, TUESDAY, WEDNESDAY};

    fn starts(slots: &[FreeSlot]) -> Vec<NaiveTime> {
        slots.iter().map(|s| s.start).collect()
    }

    #[test]
    fn test_single_busy_interval() {
        let events = vec![Event::new("A", MONDAY, hm(9, 0), hm(10, 0))
            .with_group("MTBG")
            .with_week(36)];
        let idx = ScheduleIndex::build(&events);
        let query = FreeSlotQuery::new(["MTBG"], 60)
            .with_weeks([36])
            .with_days([MONDAY])
            .with_window(hm(8, 0), hm(12, 0))
            .with_granularity(30);

        let slots = idx.find_free_slots(&query).unwrap();
        assert_eq!(
            starts(&slots),
            vec![hm(8, 0), hm(10, 0), hm(10, 30), hm(11, 0)]
        );
        assert!(slots.iter().all(|s| s.week == 36 && s.day == MONDAY));
    }

    #[test]
    fn test_all_groups_must_be_free() {
        let events = vec![
            Event::new("A", MONDAY, hm(8, 0), hm(9, 0)).with_group("MTBG").with_week(36),
            Event::new("B", MONDAY, hm(10, 0), hm(11, 0)).with_group("NGMV").with_week(36),
        ];
        let idx = ScheduleIndex::build(&events);
        let query = FreeSlotQuery::new(["MTBG", "NGMV"], 60)
            .with_weeks([36])
            .with_days([MONDAY])
            .with_window(hm(8, 0), hm(12, 0))
            .with_granularity(60);

        let slots = idx.find_free_slots(&query).unwrap();
        assert_eq!(starts(&slots), vec![hm(9, 0), hm(11, 0)]);
    }

    #[test]
    fn test_touching_busy_intervals_merge() {
        let merged = merge_busy_runs(vec![
            TimeRange::new(hm(10, 0), hm(11, 0)),
            TimeRange::new(hm(9, 0), hm(10, 0)),
            TimeRange::new(hm(13, 0), hm(14, 0)),
            TimeRange::new(hm(9, 30), hm(9, 45)),
        ]);
        assert_eq!(
            merged,
            vec![
                TimeRange::new(hm(9, 0), hm(11, 0)),
                TimeRange::new(hm(13, 0), hm(14, 0)),
            ]
        );
    }

    #[test]
    fn test_slot_touching_merged_run_is_free() {
        let events = vec![
            Event::new("A", MONDAY, hm(9, 0), hm(10, 0)).with_group("MTBG").with_week(36),
            Event::new("B", MONDAY, hm(10, 0), hm(11, 0)).with_group("MTBG").with_week(36),
        ];
        let idx = ScheduleIndex::build(&events);
        let query = FreeSlotQuery::new(["MTBG"], 60)
            .with_weeks([36])
            .with_days([MONDAY])
            .with_window(hm(8, 0), hm(12, 0))
            .with_granularity(60);

        let slots = idx.find_free_slots(&query).unwrap();
        assert_eq!(starts(&slots), vec![hm(8, 0), hm(11, 0)]);
    }

    #[test]
    fn test_iteration_order() {
        let idx = ScheduleIndex::default();
        let query = FreeSlotQuery::new(["MTBG"], 120)
            .with_weeks([37, 36])
            .with_days([WEDNESDAY, TUESDAY])
            .with_window(hm(8, 0), hm(12, 0))
            .with_granularity(120);

        let slots = idx.find_free_slots(&query).unwrap();
        let keys: Vec<(u32, u8, NaiveTime)> =
            slots.iter().map(|s| (s.week, s.day, s.start)).collect();
        assert_eq!(
            keys,
            vec![
                (36, TUESDAY, hm(8, 0)),
                (36, TUESDAY, hm(10, 0)),
                (36, WEDNESDAY, hm(8, 0)),
                (36, WEDNESDAY, hm(10, 0)),
                (37, TUESDAY, hm(8, 0)),
                (37, TUESDAY, hm(10, 0)),
                (37, WEDNESDAY, hm(8, 0)),
                (37, WEDNESDAY, hm(10, 0)),
            ]
        );
    }

    #[test]
    fn test_no_fit_is_empty_not_error() {
        let idx = ScheduleIndex::default();
        let query = FreeSlotQuery::new(["MTBG"], 300)
            .with_weeks([36])
            .with_window(hm(8, 0), hm(12, 0));
        assert!(idx.find_free_slots(&query).unwrap().is_empty());

        let no_weeks = FreeSlotQuery::new(["MTBG"], 60);
        assert!(idx.find_free_slots(&no_weeks).unwrap().is_empty());
    }

    #[test]
    fn test_huge_duration_is_empty() {
        let idx = ScheduleIndex::default();
        let query = FreeSlotQuery::new(["MTBG"], i64::MAX)
            .with_weeks([36])
            .with_days([MONDAY])
            .with_window(hm(8, 0), hm(12, 0));
        assert!(idx.find_free_slots(&query).unwrap().is_empty());
    }

    #[test]
    fn test_huge_granularity_yields_first_candidate_only() {
        let idx = ScheduleIndex::default();
        let query = FreeSlotQuery::new(["MTBG"], 60)
            .with_weeks([36])
            .with_days([MONDAY])
            .with_window(hm(8, 0), hm(12, 0))
            .with_granularity(i64::MAX);
        assert_eq!(starts(&idx.find_free_slots(&query).unwrap()), vec![hm(8, 0)]);
    }

    #[test]
    fn test_window_with_seconds_rounds_start_up() {
        let idx = ScheduleIndex::default();
        let window_start = NaiveTime::from_hms_opt(8, 0, 30).unwrap();
        let window_end = NaiveTime::from_hms_opt(11, 59, 45).unwrap();
        let query = FreeSlotQuery::new(["MTBG"], 60)
            .with_weeks([36])
            .with_days([MONDAY])
            .with_window(window_start, window_end)
            .with_granularity(60);

        let slots = idx.find_free_slots(&query).unwrap();
        assert_eq!(starts(&slots), vec![hm(8, 1), hm(9, 1), hm(10, 1)]);
        assert!(slots
            .iter()
            .all(|s| s.start >= window_start && s.end <= window_end));

        let sliver = query.with_window(window_start, NaiveTime::from_hms_opt(8, 0, 50).unwrap());
        assert!(idx.find_free_slots(&sliver).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        let idx = ScheduleIndex::default();
        let base = FreeSlotQuery::new(["MTBG"], 60).with_weeks([36]);

        let zero_duration = FreeSlotQuery {
            duration_min: 0,
            ..base.clone()
        };
        assert!(matches!(
            idx.find_free_slots(&zero_duration),
            Err(ScheduleError::InvalidArgument(_))
        ));

        let zero_step = base.clone().with_granularity(0);
        assert!(matches!(
            idx.find_free_slots(&zero_step),
            Err(ScheduleError::InvalidArgument(_))
        ));

        let inverted = base.clone().with_window(hm(12, 0), hm(8, 0));
        assert!(matches!(
            idx.find_free_slots(&inverted),
            Err(ScheduleError::InvalidArgument(_))
        ));

        let empty = base.with_window(hm(8, 0), hm(8, 0));
        assert!(idx.find_free_slots(&empty).is_err());
    }

    #[test]
    fn test_default_query() {
        let q = FreeSlotQuery::default();
        assert_eq!(q.duration_min, 90);
        assert_eq!(q.granularity_min, 30);
        assert_eq!(q.window_start, hm(8, 0));
        assert_eq!(q.window_end, hm(18, 0));
        assert_eq!(q.days, (0..=4).collect::<BTreeSet<u8>>());
        assert!(q.validate().is_ok());
    }

    #[test]
    fn test_toml_config() {
        let q = FreeSlotQuery::from_toml_str(
            r#"
            groups = ["MTBG", "NGMV"]
            weeks = [36, 37, 38]
            days = [0, 2]
            duration_min = 45
            window_start = "09:15"
            window_end = "16:00"
            granularity_min = 15
            "#,
        )
        .unwrap();
        assert_eq!(q.groups.len(), 2);
        assert_eq!(q.days, BTreeSet::from([0, 2]));
        assert_eq!(q.window_start, hm(9, 15));
        assert_eq!(q.granularity_min, 15);

        let bad = FreeSlotQuery::from_toml_str("duration_min = -5");
        assert!(matches!(bad, Err(ScheduleError::InvalidArgument(_))));

        let malformed = FreeSlotQuery::from_toml_str("window_start = \"nine\"");
        assert!(matches!(malformed, Err(ScheduleError::Config(_))));
    }

    #[test]
    fn test_free_slot_json() {
        let slot = FreeSlot {
            week: 36,
            day: MONDAY,
            start: hm(8, 0),
            end: hm(9, 30),
        };
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"{"week":36,"day":0,"start":"08:00","end":"09:30"}"#);
        assert_eq!(slot.weekday_label(), "Mon");
        assert_eq!(slot.time_range().duration_minutes(), 90);
    }
}
