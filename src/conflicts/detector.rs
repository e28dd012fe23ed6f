//! Proposed-session conflict check.

use log::debug;

use crate::models::{overlaps, ConflictRecord, Event, ProposedSession};

/// Reports every event in `pool` that clashes with `proposal`.
///
/// An event clashes when, on the proposal's day and week, it shares a
/// program OR a teacher with the proposal and its time genuinely
/// overlaps (touching does not count). An empty proposal group or teacher
/// set never matches on that dimension.
///
/// Records follow pool order.
///
/// # Example
/// ```
/// use chrono::NaiveTime;
/// use u_timetable::conflicts::detect_conflicts;
/// use u_timetable::models::{Event, ProposedSession, MONDAY};
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// let pool = vec![Event::new("MA101", MONDAY, t(9), t(11)).with_group("MTBG").with_week(36)];
///
/// let proposal = ProposedSession::new(MONDAY, t(10), t(12), 36).with_groups(["MTBG"]);
/// assert_eq!(detect_conflicts(&pool, &proposal).len(), 1);
///
/// let back_to_back = ProposedSession::new(MONDAY, t(11), t(12), 36).with_groups(["MTBG"]);
/// assert!(detect_conflicts(&pool, &back_to_back).is_empty());
/// ```
pub fn detect_conflicts(pool: &[Event], proposal: &ProposedSession) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();

    for ev in pool {
        if ev.day != proposal.day || !ev.covers_week(proposal.week) {
            continue;
        }

        let shares_group = ev.shares_group(&proposal.groups);
        let shares_teacher = ev.shares_teacher(&proposal.teachers);
        if !(shares_group || shares_teacher) {
            continue;
        }

        if overlaps(ev.start, ev.end, proposal.start, proposal.end) {
            conflicts.push(ConflictRecord::from_event(
                ev,
                proposal.week,
                shares_group,
                shares_teacher,
            ));
        }
    }

    debug!(
        "Proposal check (day {}, week {}): {} conflicts in pool of {}",
        proposal.day,
        proposal.week,
        conflicts.len(),
        pool.len()
    );
    conflicts
}

/// Runs [`detect_conflicts`] for the proposal on each of `days`, in the
/// order given, and concatenates the results.
pub fn detect_conflicts_on_days<I>(
    pool: &[Event],
    proposal: &ProposedSession,
    days: I,
) -> Vec<ConflictRecord>
where
    I: IntoIterator<Item = u8>,
{
    days.into_iter()
        .flat_map(|day| detect_conflicts(pool, &proposal.on_day(day)))
        .collect()
}
