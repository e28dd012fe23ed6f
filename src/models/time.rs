//! Time-of-day intervals.
//!
//! All times are wall-clock times within a single day (`NaiveTime`).
//! Intervals are half-open `[start, end)`; spans across midnight are
//! not representable.
//!
//! # Boundary rule
//! Two sessions that merely touch (10:00–12:00 and 12:00–14:00) do not
//! overlap. Back-to-back teaching is never a double-booking.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Whether `[a_start, a_end)` and `[b_start, b_end)` genuinely intersect.
///
/// Touching intervals (`a_end == b_start` or `b_end == a_start`) return
/// `false`. Symmetric in its two intervals.
///
/// ```
/// use u_timetable::models::overlaps;
///
/// assert!(!overlaps(600, 720, 720, 840)); // 10:00-12:00 vs 12:00-14:00
/// assert!(overlaps(600, 720, 719, 840));  // 10:00-12:00 vs 11:59-14:00
/// ```
#[inline]
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// A time-of-day interval [start, end).
///
/// Ordering is by start, then end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start (inclusive).
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Interval end (exclusive).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeRange {
    /// Creates a new range.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Length of the range in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether a time falls within this range.
    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two ranges overlap (touching ranges do not).
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

/// Minutes elapsed since midnight, ignoring seconds.
#[inline]
pub fn minutes_from_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Minutes since midnight, rounded up to the next whole minute.
pub fn minutes_from_midnight_ceil(time: NaiveTime) -> i64 {
    let whole = minutes_from_midnight(time);
    if time.second() == 0 && time.nanosecond() == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Converts a minute-of-day back into a time. `None` outside `0..1440`.
pub fn time_from_minutes(minutes: i64) -> Option<NaiveTime> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Formats a time as `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(hhmm::FORMAT).to_string()
}

/// serde codec storing a `NaiveTime` as an `"HH:MM"` string.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Test shorthand for `HH:MM`.
#[cfg(test)]
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_touch_is_not_overlap() {
        assert!(!overlaps(hm(10, 0), hm(12, 0), hm(12, 0), hm(14, 0)));
        assert!(!overlaps(hm(12, 0), hm(14, 0), hm(10, 0), hm(12, 0)));
        assert!(overlaps(hm(10, 0), hm(12, 0), hm(11, 59), hm(14, 0)));
    }

    #[test]
    fn test_containment_and_identity_overlap() {
        assert!(overlaps(hm(8, 0), hm(17, 0), hm(10, 0), hm(11, 0)));
        assert!(overlaps(hm(10, 0), hm(11, 0), hm(10, 0), hm(11, 0)));
        assert!(!overlaps(hm(8, 0), hm(9, 0), hm(13, 0), hm(14, 0)));
    }

    #[test]
    fn test_overlap_symmetry_on_minute_grid() {
        // Exhaustive over a small grid of quarter hours.
        let points: Vec<i64> = (0..=8).map(|q| 480 + q * 15).collect();
        for &a in &points {
            for &b in points.iter().filter(|&&b| b > a) {
                for &c in &points {
                    for &d in points.iter().filter(|&&d| d > c) {
                        assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_time_range() {
        let r = TimeRange::new(hm(9, 0), hm(10, 30));
        assert_eq!(r.duration_minutes(), 90);
        assert!(r.contains(hm(9, 0)));
        assert!(r.contains(hm(10, 29)));
        assert!(!r.contains(hm(10, 30))); // exclusive end
        assert!(!r.overlaps(&TimeRange::new(hm(10, 30), hm(11, 0))));
        assert!(r.overlaps(&TimeRange::new(hm(10, 0), hm(11, 0))));
    }

    #[test]
    fn test_time_range_ordering() {
        let mut ranges = vec![
            TimeRange::new(hm(13, 0), hm(14, 0)),
            TimeRange::new(hm(9, 0), hm(12, 0)),
            TimeRange::new(hm(9, 0), hm(10, 0)),
        ];
        ranges.sort();
        assert_eq!(ranges[0], TimeRange::new(hm(9, 0), hm(10, 0)));
        assert_eq!(ranges[2].start, hm(13, 0));
    }

    #[test]
    fn test_minute_conversions() {
        assert_eq!(minutes_from_midnight(hm(8, 30)), 510);
        assert_eq!(time_from_minutes(510), Some(hm(8, 30)));
        assert_eq!(time_from_minutes(MINUTES_PER_DAY), None);
        assert_eq!(time_from_minutes(-1), None);
        assert_eq!(format_hhmm(hm(9, 5)), "09:05");

        let with_seconds = NaiveTime::from_hms_opt(8, 30, 1).unwrap();
        assert_eq!(minutes_from_midnight(with_seconds), 510);
        assert_eq!(minutes_from_midnight_ceil(with_seconds), 511);
        assert_eq!(minutes_from_midnight_ceil(hm(8, 30)), 510);
    }

    #[test]
    fn test_hhmm_serde() {
        let r = TimeRange::new(hm(9, 0), hm(10, 15));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"start":"09:00","end":"10:15"}"#);
        let back: TimeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
