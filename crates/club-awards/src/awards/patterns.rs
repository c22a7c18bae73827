//! Temporal pattern detectors.
//!
//! All detectors answer "has this ever happened" over a member's full
//! eligible history, so the scans are uncapped, unlike the streak window.
//! Each returns a plain boolean; the caller owns the grant bookkeeping.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

use super::domain::{EventKind, EventSummary, PersonId, RsvpView};
use super::history::{HistoryError, HistoryReader, RsvpFilter};

/// Minimum session count for a week to qualify for the perfect-week check.
const PERFECT_WEEK_MIN_SESSIONS: usize = 2;
/// Minimum session count for a month to qualify for the unbroken-month check.
const UNBROKEN_MONTH_MIN_SESSIONS: usize = 4;
/// Attended-session count that makes a season a century season.
const SEASON_CENTURION_TARGET: u32 = 100;

/// Everything the detectors need for one member, fetched in two reads.
pub(crate) struct PatternSnapshot {
    /// All past attendance-eligible events, club-wide.
    pub events: Vec<EventSummary>,
    /// The member's attended (yes, not late-cancelled) eligible RSVPs.
    pub attended: Vec<RsvpView>,
}

pub(crate) fn snapshot<H: HistoryReader + ?Sized>(
    history: &H,
    person: &PersonId,
) -> Result<PatternSnapshot, HistoryError> {
    let events = history.events(&EventKind::ATTENDANCE_ELIGIBLE, true)?;
    let mut attended = history.eligible_rsvps(person, &RsvpFilter::attended_sessions())?;
    attended.retain(|rsvp| !rsvp.cancelled_late);
    Ok(PatternSnapshot { events, attended })
}

fn week_key(at: DateTime<Utc>) -> (i32, u32) {
    let week = at.iso_week();
    (week.year(), week.week())
}

fn month_key(at: DateTime<Utc>) -> (i32, u32) {
    (at.year(), at.month())
}

/// Season starting in September: a session belongs to its own year from
/// September onward, otherwise to the previous year.
pub(crate) fn season_of(at: DateTime<Utc>) -> i32 {
    if at.month() >= 9 {
        at.year()
    } else {
        at.year() - 1
    }
}

/// Any ISO week with at least two sessions, all of them attended.
pub(crate) fn has_perfect_week(snapshot: &PatternSnapshot) -> bool {
    has_full_bucket(snapshot, PERFECT_WEEK_MIN_SESSIONS, week_key)
}

/// Any calendar month with at least four sessions, all of them attended.
pub(crate) fn has_unbroken_month(snapshot: &PatternSnapshot) -> bool {
    has_full_bucket(snapshot, UNBROKEN_MONTH_MIN_SESSIONS, month_key)
}

fn has_full_bucket<K: Ord>(
    snapshot: &PatternSnapshot,
    min_sessions: usize,
    key: fn(DateTime<Utc>) -> K,
) -> bool {
    let mut totals: BTreeMap<K, usize> = BTreeMap::new();
    for event in &snapshot.events {
        *totals.entry(key(event.start)).or_default() += 1;
    }

    let mut attended: BTreeMap<K, usize> = BTreeMap::new();
    for rsvp in &snapshot.attended {
        *attended.entry(key(rsvp.event_start)).or_default() += 1;
    }

    totals.into_iter().any(|(bucket, total)| {
        total >= min_sessions && attended.get(&bucket).copied().unwrap_or(0) >= total
    })
}

/// Three consecutive week buckets reading attended, missed everything,
/// attended again. Buckets are the ordered weeks that held sessions, so the
/// comparison is positional over calendar order, never over RSVP adjacency.
pub(crate) fn has_streak_saver(snapshot: &PatternSnapshot) -> bool {
    let mut weeks: BTreeMap<(i32, u32), bool> = BTreeMap::new();
    for event in &snapshot.events {
        weeks.entry(week_key(event.start)).or_insert(false);
    }
    for rsvp in &snapshot.attended {
        if let Some(attended_any) = weeks.get_mut(&week_key(rsvp.event_start)) {
            *attended_any = true;
        }
    }

    let by_week: Vec<bool> = weeks.into_values().collect();
    by_week
        .windows(3)
        .any(|window| window[0] && !window[1] && window[2])
}

/// Any September-to-August season with one hundred attended sessions.
pub(crate) fn has_century_season(snapshot: &PatternSnapshot) -> bool {
    let mut seasons: BTreeMap<i32, u32> = BTreeMap::new();
    for rsvp in &snapshot.attended {
        *seasons.entry(season_of(rsvp.event_start)).or_default() += 1;
    }
    seasons.values().any(|count| *count >= SEASON_CENTURION_TARGET)
}
