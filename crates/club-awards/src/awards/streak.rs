//! Current consecutive-attendance streak.

use super::domain::{EventKind, PersonId};
use super::history::{HistoryError, HistoryReader, RsvpFilter};

/// Row cap for the streak scan. Streaks longer than the cap are only
/// distinguished when a break falls inside the window; this is an accepted
/// approximation that keeps the query bounded.
pub const STREAK_SCAN_CAP: usize = 50;

/// Walk the most recent `yes` responses on attendance-eligible events,
/// newest event first, and count until the first late cancellation. The
/// breaking record itself is not counted, and anything older than the break
/// is irrelevant once one is found.
pub fn current_streak<H: HistoryReader + ?Sized>(
    history: &H,
    person: &PersonId,
) -> Result<u32, HistoryError> {
    let filter = RsvpFilter {
        kinds: Some(EventKind::ATTENDANCE_ELIGIBLE.to_vec()),
        only_past: true,
        only_yes: true,
        max_rows: Some(STREAK_SCAN_CAP),
    };
    let recent = history.eligible_rsvps(person, &filter)?;

    let mut streak = 0;
    for rsvp in &recent {
        if rsvp.cancelled_late {
            break;
        }
        streak += 1;
    }

    Ok(streak)
}
