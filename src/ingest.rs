//! Raw timetable rows to normalised events.
//!
//! Timetables arrive as loosely formatted text columns: weekday names in
//! Swedish or English, times as `9`, `9.15` or `09:15`, week lists such as
//! `v36–38, 40`, and `;`-separated program and teacher lists in any case.
//! This module turns such a row into an [`Event`] with upper-case token
//! sets, so the engine never has to case-fold or parse.
//!
//! # Example
//! ```
//! use u_timetable::ingest::RawEventRow;
//!
//! let row = RawEventRow {
//!     course: "MA101".into(),
//!     groups: "mtbg; ngmv".into(),
//!     day: "Måndag".into(),
//!     start: "9.15".into(),
//!     end: "11:00".into(),
//!     weeks: "v36-38, 40".into(),
//!     teacher: "Lund".into(),
//! };
//! let ev = row.to_event().unwrap();
//! assert_eq!(ev.day, 0);
//! assert!(ev.groups.contains("NGMV"));
//! assert_eq!(ev.weeks.len(), 4);
//! ```

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{Event, SUNDAY};

/// Weekday spellings after lower-casing and folding å/ä to `a`, ö to `o`.
const DAY_NAMES: &[(&str, u8)] = &[
    ("man", 0),
    ("mandag", 0),
    ("mon", 0),
    ("monday", 0),
    ("tis", 1),
    ("tisdag", 1),
    ("tue", 1),
    ("tues", 1),
    ("tuesday", 1),
    ("ons", 2),
    ("onsdag", 2),
    ("wed", 2),
    ("weds", 2),
    ("wednesday", 2),
    ("tor", 3),
    ("tors", 3),
    ("torsdag", 3),
    ("thu", 3),
    ("thur", 3),
    ("thurs", 3),
    ("thursday", 3),
    ("fre", 4),
    ("fredag", 4),
    ("fri", 4),
    ("friday", 4),
    ("lor", 5),
    ("lordag", 5),
    ("sat", 5),
    ("saturday", 5),
    ("son", 6),
    ("sondag", 6),
    ("sun", 6),
    ("sunday", 6),
];

/// One timetable row as text columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventRow {
    /// Course identifier.
    pub course: String,
    /// `;`-separated program tokens.
    pub groups: String,
    /// Weekday name or number.
    pub day: String,
    /// Start time.
    pub start: String,
    /// End time.
    pub end: String,
    /// Week expression, e.g. `36-38, 40`.
    pub weeks: String,
    /// `;`-separated teacher tokens; may be blank.
    #[serde(default)]
    pub teacher: String,
}

impl RawEventRow {
    /// Parses the row into an event.
    ///
    /// # Errors
    /// The first column that fails to parse, as `UnknownWeekday`,
    /// `InvalidTime` or `InvalidWeeks`.
    pub fn to_event(&self) -> Result<Event> {
        let day = parse_day(&self.day)?;
        let start = parse_time(&self.start)?;
        let end = parse_time(&self.end)?;
        let weeks = parse_weeks(&self.weeks)?;

        Ok(Event::new(self.course.trim(), day, start, end)
            .with_groups(parse_tokens(&self.groups))
            .with_weeks(weeks)
            .with_teachers(parse_tokens(&self.teacher)))
    }
}

/// Parses every row, stopping at the first failure.
pub fn events_from_rows(rows: &[RawEventRow]) -> Result<Vec<Event>> {
    rows.iter().map(RawEventRow::to_event).collect()
}

/// Splits a `;`-separated list into trimmed upper-case tokens.
pub fn parse_tokens(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Joins tokens with `;` in sorted order.
pub fn tokens_to_string<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let sorted: BTreeSet<&str> = tokens.into_iter().map(String::as_str).collect();
    sorted.into_iter().collect::<Vec<_>>().join(";")
}

fn fold_ascii(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| match c {
            'å' | 'ä' => 'a',
            'ö' => 'o',
            other => other,
        })
        .collect()
}

/// Parses a weekday into 0 (Monday) … 6 (Sunday).
///
/// Accepts Swedish and English names and abbreviations in any case, any
/// name whose first three letters are a known abbreviation, numbers
/// 0–6, and 7 for Sunday (1–7 numbering).
pub fn parse_day(raw: &str) -> Result<u8> {
    let s = raw.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        return match s.parse::<u8>() {
            Ok(n) if n <= SUNDAY => Ok(n),
            Ok(7) => Ok(SUNDAY),
            _ => Err(ScheduleError::UnknownWeekday(raw.to_string())),
        };
    }

    let folded = fold_ascii(s);
    let lookup = |key: &str| {
        DAY_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|&(_, day)| day)
    };

    lookup(&folded)
        .or_else(|| {
            let prefix: String = folded.chars().take(3).collect();
            (prefix.chars().count() == 3).then(|| lookup(&prefix)).flatten()
        })
        .ok_or_else(|| ScheduleError::UnknownWeekday(raw.to_string()))
}

/// Parses a time of day.
///
/// Accepts `HH:MM`, `HH:MM:SS` (seconds dropped), `H.MM` and a bare hour.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let s = raw.trim();
    let invalid = || ScheduleError::InvalidTime(raw.to_string());
    let number = |part: &str| -> Result<u32> {
        let part = part.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    let (hour, minute) = if let Some((h, rest)) = s.split_once(':') {
        let m = rest.split(':').next().unwrap_or_default();
        (number(h)?, number(m)?)
    } else if let Some((h, m)) = s.split_once('.') {
        (number(h)?, number(m)?)
    } else {
        (number(s)?, 0)
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Highest week number a year can have.
pub const MAX_WEEK: u32 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeekToken {
    Number(u32),
    Dash,
    Separator,
}

fn tokenize_weeks(raw: &str) -> Result<Vec<WeekToken>> {
    let mut tokens = Vec::new();
    let mut digits = String::new();

    let flush = |digits: &mut String, tokens: &mut Vec<WeekToken>| -> Result<()> {
        if !digits.is_empty() {
            let n: u32 = digits
                .parse()
                .map_err(|_| ScheduleError::InvalidWeeks(raw.to_string()))?;
            if n > MAX_WEEK {
                return Err(ScheduleError::InvalidWeeks(raw.to_string()));
            }
            tokens.push(WeekToken::Number(n));
            digits.clear();
        }
        Ok(())
    };

    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        flush(&mut digits, &mut tokens)?;
        match c {
            '-' | '\u{2013}' | '\u{2014}' => tokens.push(WeekToken::Dash),
            ',' | ';' | '/' => tokens.push(WeekToken::Separator),
            // Letters ("v", "w", "vecka") and spacing only end a number.
            _ => {}
        }
    }
    flush(&mut digits, &mut tokens)?;
    Ok(tokens)
}

/// Parses a week expression into a set of week numbers.
///
/// Accepts comma lists and ranges with optional `v`/`w`/`vecka`
/// prefixes and en-dashes: `36-38, 40`, `v36–38`, `W36`, `veckor 36 - 38`.
/// Reversed ranges (`38-36`) are normalised.
///
/// # Errors
/// `InvalidWeeks` when the expression holds no number or a number above
/// [`MAX_WEEK`].
pub fn parse_weeks(raw: &str) -> Result<BTreeSet<u32>> {
    let tokens = tokenize_weeks(raw)?;
    let mut weeks = BTreeSet::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i..] {
            [WeekToken::Number(a), WeekToken::Dash, WeekToken::Number(b), ..] => {
                let (lo, hi) = if a <= b { (*a, *b) } else { (*b, *a) };
                weeks.extend(lo..=hi);
                i += 3;
            }
            [WeekToken::Number(n), ..] => {
                weeks.insert(*n);
                i += 1;
            }
            _ => i += 1,
        }
    }

    if weeks.is_empty() {
        return Err(ScheduleError::InvalidWeeks(raw.to_string()));
    }
    Ok(weeks)
}
