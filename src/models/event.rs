//! Timetabled session model.
//!
//! An event is one normalised timetable row: a course taught to one or
//! more programs, on one weekday, at one time of day, recurring over a
//! set of week numbers.
//!
//! # Normalisation
//! Group and teacher tokens are expected upper-case. The engine compares
//! them verbatim and never case-folds; see [`crate::ingest`] for the
//! normalising parser.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::time::{hhmm, TimeRange};

/// Monday as a day index.
pub const MONDAY: u8 = 0;
/// Tuesday as a day index.
pub const TUESDAY: u8 = 1;
/// Wednesday as a day index.
pub const WEDNESDAY: u8 = 2;
/// Thursday as a day index.
pub const THURSDAY: u8 = 3;
/// Friday as a day index.
pub const FRIDAY: u8 = 4;
/// Saturday as a day index.
pub const SATURDAY: u8 = 5;
/// Sunday as a day index.
pub const SUNDAY: u8 = 6;

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Short English label for a day index (`"Mon"` … `"Sun"`), `"?"` when out of range.
pub fn weekday_label(day: u8) -> &'static str {
    WEEKDAY_LABELS.get(usize::from(day)).copied().unwrap_or("?")
}

/// One scheduled session.
///
/// Constructed once and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Course identifier (opaque).
    pub course: String,
    /// Program tokens served by this session. May be empty.
    pub groups: BTreeSet<String>,
    /// Weekday, 0 = Monday … 6 = Sunday.
    pub day: u8,
    /// Start time (inclusive).
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End time (exclusive). `start < end` is the caller's contract.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Week numbers the session recurs in.
    pub weeks: BTreeSet<u32>,
    /// Teacher tokens. Empty = unassigned.
    pub teachers: BTreeSet<String>,
}

impl Event {
    /// Creates an event with no groups, weeks or teachers.
    pub fn new(course: impl Into<String>, day: u8, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            course: course.into(),
            groups: BTreeSet::new(),
            day,
            start,
            end,
            weeks: BTreeSet::new(),
            teachers: BTreeSet::new(),
        }
    }

    /// Adds a program token.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Adds several program tokens.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Adds a week number.
    pub fn with_week(mut self, week: u32) -> Self {
        self.weeks.insert(week);
        self
    }

    /// Adds several week numbers.
    pub fn with_weeks(mut self, weeks: impl IntoIterator<Item = u32>) -> Self {
        self.weeks.extend(weeks);
        self
    }

    /// Adds a teacher token.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teachers.insert(teacher.into());
        self
    }

    /// Adds several teacher tokens.
    pub fn with_teachers<I, S>(mut self, teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teachers.extend(teachers.into_iter().map(Into::into));
        self
    }

    /// The session's time of day as a range.
    #[inline]
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    /// Whether the session takes place in `week`.
    #[inline]
    pub fn covers_week(&self, week: u32) -> bool {
        self.weeks.contains(&week)
    }

    /// Whether any of `groups` is served by this session.
    pub fn shares_group(&self, groups: &BTreeSet<String>) -> bool {
        !self.groups.is_disjoint(groups)
    }

    /// Whether any of `teachers` teaches this session.
    pub fn shares_teacher(&self, teachers: &BTreeSet<String>) -> bool {
        !self.teachers.is_disjoint(teachers)
    }

    /// Short weekday label.
    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.day)
    }
}
