//! Busy-interval index over a term's events.
//!
//! Maps `group → week → day → [TimeRange]` so the busy time of any
//! program on any day can be read without scanning the event pool.
//!
//! # Lifecycle
//! The index is built wholesale from an event snapshot and never updated
//! afterwards. After any change to the underlying events, build a new
//! index; an existing one must not be assumed to reflect later writes.
//!
//! # Ungrouped events
//! Events with no program token have no key to be filed under and are
//! absent from the index. They never block a free-slot search, although
//! the conflict detector (which scans the raw pool) still sees them.

use std::collections::HashMap;

use log::debug;

use crate::models::{Event, TimeRange};

type DayMap = HashMap<u8, Vec<TimeRange>>;
type WeekMap = HashMap<u32, DayMap>;

/// Sorted busy intervals per (group, week, day).
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    index: HashMap<String, WeekMap>,
    interval_count: usize,
}

impl ScheduleIndex {
    /// Builds the index from an event snapshot.
    ///
    /// Every event contributes one interval per (group, week) it covers.
    /// Each bucket is sorted by start time once all events are ingested.
    ///
    /// # Complexity
    /// O(E·G·W) insertions plus O(k log k) per bucket of size k.
    pub fn build<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut index: HashMap<String, WeekMap> = HashMap::new();
        let mut interval_count = 0;
        let mut event_count = 0;

        for ev in events {
            event_count += 1;
            for group in &ev.groups {
                let weeks = index.entry(group.clone()).or_default();
                for &week in &ev.weeks {
                    weeks
                        .entry(week)
                        .or_default()
                        .entry(ev.day)
                        .or_default()
                        .push(ev.time_range());
                    interval_count += 1;
                }
            }
        }

        for weeks in index.values_mut() {
            for days in weeks.values_mut() {
                for intervals in days.values_mut() {
                    intervals.sort();
                }
            }
        }

        debug!(
            "Built schedule index: {} events, {} groups, {} intervals",
            event_count,
            index.len(),
            interval_count
        );

        Self {
            index,
            interval_count,
        }
    }

    /// Busy intervals of `group` in `week` on `day`, sorted by start.
    ///
    /// Returns an empty slice when nothing is booked.
    pub fn busy(&self, group: &str, week: u32, day: u8) -> &[TimeRange] {
        self.index
            .get(group)
            .and_then(|weeks| weeks.get(&week))
            .and_then(|days| days.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All indexed group tokens (unordered).
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Whether `group` has any booking.
    pub fn contains_group(&self, group: &str) -> bool {
        self.index.contains_key(group)
    }

    /// Total number of indexed intervals.
    pub fn interval_count(&self) -> usize {
        self.interval_count
    }

    /// Whether the index holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.interval_count == 0
    }
}
