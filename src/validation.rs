//! Input validation for timetable events.
//!
//! The engine itself trusts its inputs: it does not reject inverted time
//! ranges or out-of-range weekdays, it simply computes over them. This
//! pass lets a caller find such rows before they produce surprising
//! results. Detects:
//! - Inverted or empty time ranges (`start >= end`)
//! - Weekday indices outside 0–6
//! - Events with no week numbers
//! - Week number 0
//!
//! All problems are collected rather than stopping at the first.

use crate::models::{format_hhmm, Event, SUNDAY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Position of the offending event in the input slice.
    pub position: usize,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `start` is not before `end`.
    InvertedTimeRange,
    /// Day index is greater than 6.
    DayOutOfRange,
    /// The event recurs in no week at all.
    EmptyWeeks,
    /// Week numbers are positive.
    InvalidWeek,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, position: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }
}

/// Validates a batch of events.
///
/// # Returns
/// `Ok(())` if every event passes, `Err(errors)` with all detected issues.
pub fn validate_events(events: &[Event]) -> ValidationResult {
    let mut errors = Vec::new();

    for (position, ev) in events.iter().enumerate() {
        if ev.start >= ev.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedTimeRange,
                position,
                format!(
                    "Event '{}' ends at {} but starts at {}",
                    ev.course,
                    format_hhmm(ev.end),
                    format_hhmm(ev.start)
                ),
            ));
        }

        if ev.day > SUNDAY {
            errors.push(ValidationError::new(
                ValidationErrorKind::DayOutOfRange,
                position,
                format!("Event '{}' has day index {}", ev.course, ev.day),
            ));
        }

        if ev.weeks.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyWeeks,
                position,
                format!("Event '{}' has no week numbers", ev.course),
            ));
        } else if ev.weeks.contains(&0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeek,
                position,
                format!("Event '{}' lists week 0", ev.course),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
