//! Conflict and collision records.
//!
//! Two output shapes:
//! - [`ConflictRecord`]: an existing event that clashes with a proposed
//!   session (one-sided).
//! - [`CollisionPair`]: two existing events that clash with each other on
//!   a shared program or teacher token (two-sided).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::event::{weekday_label, Event};
use super::time::{hhmm, TimeRange};

/// A session someone wants to add, checked against the existing timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedSession {
    /// Program tokens the session would serve.
    pub groups: BTreeSet<String>,
    /// Teacher tokens that would teach it.
    pub teachers: BTreeSet<String>,
    /// Weekday, 0 = Monday.
    pub day: u8,
    /// Start time.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Week number being checked.
    pub week: u32,
}

impl ProposedSession {
    /// Creates a proposal with no groups or teachers.
    pub fn new(day: u8, start: NaiveTime, end: NaiveTime, week: u32) -> Self {
        Self {
            groups: BTreeSet::new(),
            teachers: BTreeSet::new(),
            day,
            start,
            end,
            week,
        }
    }

    /// Adds program tokens.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Adds teacher tokens.
    pub fn with_teachers<I, S>(mut self, teachers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teachers.extend(teachers.into_iter().map(Into::into));
        self
    }

    /// Same proposal on another weekday.
    pub fn on_day(&self, day: u8) -> Self {
        Self { day, ..self.clone() }
    }

    /// The proposed time of day as a range.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}

/// An existing event that clashes with a proposed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// Course of the existing event.
    pub course: String,
    /// Programs of the existing event.
    pub groups: BTreeSet<String>,
    /// Teachers of the existing event.
    pub teachers: BTreeSet<String>,
    /// Week in which the clash happens.
    pub week: u32,
    /// Weekday of the clash.
    pub day: u8,
    /// Start of the existing event.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End of the existing event.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// The clash involves a shared program.
    pub shares_group: bool,
    /// The clash involves a shared teacher.
    pub shares_teacher: bool,
}

impl ConflictRecord {
    pub(crate) fn from_event(
        event: &Event,
        week: u32,
        shares_group: bool,
        shares_teacher: bool,
    ) -> Self {
        Self {
            course: event.course.clone(),
            groups: event.groups.clone(),
            teachers: event.teachers.clone(),
            week,
            day: event.day,
            start: event.start,
            end: event.end,
            shares_group,
            shares_teacher,
        }
    }

    /// Short weekday label.
    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.day)
    }
}

/// The token set a collision report groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Group by program tokens; teachers are carried as metadata.
    Program,
    /// Group by teacher tokens; programs are carried as metadata.
    Teacher,
}

impl Dimension {
    /// Tokens of `event` along this dimension.
    pub fn tokens<'a>(&self, event: &'a Event) -> &'a BTreeSet<String> {
        match self {
            Dimension::Program => &event.groups,
            Dimension::Teacher => &event.teachers,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Program => write!(f, "program"),
            Dimension::Teacher => write!(f, "teacher"),
        }
    }
}

/// One side of a collision pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionSide {
    /// Course identifier.
    pub course: String,
    /// Programs of the event.
    pub groups: BTreeSet<String>,
    /// Teachers of the event.
    pub teachers: BTreeSet<String>,
    /// Start time.
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End time.
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl From<&Event> for CollisionSide {
    fn from(event: &Event) -> Self {
        Self {
            course: event.course.clone(),
            groups: event.groups.clone(),
            teachers: event.teachers.clone(),
            start: event.start,
            end: event.end,
        }
    }
}

/// Two existing events booked on the same token, week and day with
/// overlapping times. `first.start <= second.start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPair {
    /// Grouping dimension of the report.
    pub dimension: Dimension,
    /// The shared program or teacher token.
    pub token: String,
    /// Week number.
    pub week: u32,
    /// Weekday.
    pub day: u8,
    /// Earlier-starting event.
    pub first: CollisionSide,
    /// Later-starting event.
    pub second: CollisionSide,
}

impl CollisionPair {
    /// Short weekday label.
    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.day)
    }

    /// The interval during which both events run.
    pub fn overlap_window(&self) -> TimeRange {
        TimeRange::new(
            self.first.start.max(self.second.start),
            self.first.end.min(self.second.end),
        )
    }
}
