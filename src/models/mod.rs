//! Timetable domain models.
//!
//! Provides the value types the engine consumes and produces. Events
//! come in already parsed and normalised; records go out as semantic
//! values (sets, times), leaving formatting to the presentation layer.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School |
//! |-------------|------------|--------|
//! | Event | Lecture/Lab session | Lesson |
//! | group token | Study program | Class |
//! | teacher token | Lecturer | Teacher |
//! | week | Term week number | School week |

mod conflict;
mod event;
mod time;

pub use conflict::{CollisionPair, CollisionSide, ConflictRecord, Dimension, ProposedSession};
pub use event::{
    weekday_label, Event, FRIDAY, MONDAY, SATURDAY, SUNDAY, THURSDAY, TUESDAY, WEDNESDAY,
};
pub use time::{
    format_hhmm, hhmm, minutes_from_midnight, minutes_from_midnight_ceil, overlaps, time_from_minutes, TimeRange,
    MINUTES_PER_DAY,
};

#[cfg(test)]
pub(crate) use time::hm;
