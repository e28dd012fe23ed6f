//! Double-booking detection.
//!
//! A conflict is either a resource clash (the same program booked twice)
//! or a people clash (the same teacher booked twice), in the same week
//! and on the same weekday, with genuinely overlapping times.
//!
//! - [`detect_conflicts`]: checks one proposed session against a pool.
//! - [`find_all_collisions`]: reports every clashing pair inside a pool,
//!   grouped by program or by teacher.
//!
//! Both scan the raw event pool rather than the
//! [`ScheduleIndex`](crate::index::ScheduleIndex), so events without any
//! program token still take part through their teachers.

mod detector;
mod reporter;

pub use detector::{detect_conflicts, detect_conflicts_on_days};
pub use reporter::{
    find_all_collisions, program_collisions, teacher_collisions, CollisionFilter,
};
