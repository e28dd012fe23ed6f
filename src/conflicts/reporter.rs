//! Pool-wide collision report.
//!
//! # Algorithm
//! 1. **Expand**: every event passing the filter yields one row per
//!    (week, token) along the report dimension.
//! 2. **Bucket**: rows are grouped by (token, week, day).
//! 3. **Scan**: each bucket is sorted by start; for each row `i` the rows
//!    after it are compared until one starts at or after `i` ends. Since
//!    the bucket is start-sorted, no later row can overlap `i` either.
//!
//! Buckets hold one token's sessions on one day of one week, so they stay
//! small and the quadratic worst case is not a concern in practice.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{overlaps, CollisionPair, CollisionSide, Dimension, Event};

/// Optional restrictions on which events enter a collision report.
///
/// Token filters admit an event when it shares at least one token with
/// the filter; an absent or empty token filter admits everything. The
/// day filter applies whenever present, so an empty day set admits
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Program tokens of interest.
    pub programs: Option<BTreeSet<String>>,
    /// Weekdays of interest.
    pub days: Option<BTreeSet<u8>>,
    /// Teacher tokens of interest.
    pub teachers: Option<BTreeSet<String>>,
}

impl CollisionFilter {
    /// A filter admitting every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to events serving any of `programs`.
    pub fn with_programs<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.programs = Some(programs.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts to events on any of `days`.
    pub fn with_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.days = Some(days.into_iter().collect());
        self
    }

    /// Restricts to events taught by any of `teachers`.
    pub fn with_teachers<I, S>(mut self, teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teachers = Some(teachers.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `event` passes every configured restriction.
    pub fn admits(&self, event: &Event) -> bool {
        if let Some(programs) = self.programs.as_ref().filter(|p| !p.is_empty()) {
            if !event.shares_group(programs) {
                return false;
            }
        }
        if let Some(teachers) = self.teachers.as_ref().filter(|t| !t.is_empty()) {
            if !event.shares_teacher(teachers) {
                return false;
            }
        }
        match &self.days {
            Some(days) => days.contains(&event.day),
            None => true,
        }
    }
}

/// Finds every pair of events in `pool` double-booked on a shared token
/// of `dimension`.
///
/// Output is sorted by (token, week, day, first start, second start) and
/// is identical across runs on the same pool.
pub fn find_all_collisions(
    pool: &[Event],
    dimension: Dimension,
    filter: &CollisionFilter,
) -> Vec<CollisionPair> {
    let mut buckets: BTreeMap<(&str, u32, u8), Vec<&Event>> = BTreeMap::new();
    let mut row_count = 0usize;

    for ev in pool.iter().filter(|ev| filter.admits(ev)) {
        for &week in &ev.weeks {
            for token in dimension.tokens(ev) {
                // Unassigned teachers never collide with each other.
                if dimension == Dimension::Teacher && token.is_empty() {
                    continue;
                }
                buckets
                    .entry((token.as_str(), week, ev.day))
                    .or_default()
                    .push(ev);
                row_count += 1;
            }
        }
    }

    let bucket_count = buckets.len();
    let mut pairs = Vec::new();

    for ((token, week, day), mut rows) in buckets {
        rows.sort_by_key(|ev| ev.start);

        for (i, a) in rows.iter().enumerate() {
            for b in &rows[i + 1..] {
                if b.start >= a.end {
                    break;
                }
                if overlaps(a.start, a.end, b.start, b.end) {
                    pairs.push(CollisionPair {
                        dimension,
                        token: token.to_string(),
                        week,
                        day,
                        first: CollisionSide::from(*a),
                        second: CollisionSide::from(*b),
                    });
                }
            }
        }
    }

    pairs.sort_by(|x, y| {
        (&x.token, x.week, x.day, x.first.start, x.second.start).cmp(&(
            &y.token,
            y.week,
            y.day,
            y.first.start,
            y.second.start,
        ))
    });

    debug!(
        "Collision report ({}): {} rows in {} buckets, {} pairs",
        dimension,
        row_count,
        bucket_count,
        pairs.len()
    );
    pairs
}

/// Collisions between sessions sharing a program.
pub fn program_collisions(pool: &[Event], filter: &CollisionFilter) -> Vec<CollisionPair> {
    find_all_collisions(pool, Dimension::Program, filter)
}

/// Collisions between sessions sharing a teacher (double-booked staff).
pub fn teacher_collisions(pool: &[Event], filter: &CollisionFilter) -> Vec<CollisionPair> {
    find_all_collisions(pool, Dimension::Teacher, filter)
}
