//! Term timetable engine.
//!
//! Detects double-bookings in a teaching timetable and finds open time
//! windows for new sessions. Works on already-normalised events in memory;
//! storage and presentation stay with the caller.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Event`, `TimeRange`, `ProposedSession`,
//!   `ConflictRecord`, `CollisionPair`, and the `overlaps` predicate
//! - **`index`**: `ScheduleIndex`, busy intervals per (program, week, day)
//! - **`conflicts`**: Proposed-session checks and pool-wide collision reports
//! - **`slots`**: Free-slot search and its `FreeSlotQuery` configuration
//! - **`validation`**: Event integrity checks (inverted times, bad days/weeks)
//! - **`ingest`**: Parsing of raw text rows (weekday names, times, week ranges)
//! - **`repository`**: `EventRepository` seam and an in-memory store
//! - **`planner`**: One-call-per-query facade over a repository
//!
//! # Overlap rule
//!
//! Intervals are half-open. Sessions that only touch (10:00–12:00 and
//! 12:00–14:00) never conflict.
//!
//! # Concurrency
//!
//! Every operation is a synchronous pure function of an event snapshot.
//! Events and indexes are immutable once built and may be shared across
//! threads freely.

pub mod conflicts;
pub mod error;
pub mod index;
pub mod ingest;
pub mod models;
pub mod planner;
pub mod repository;
pub mod slots;
pub mod validation;

pub use error::{Result, ScheduleError};
