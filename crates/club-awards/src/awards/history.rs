//! Read-only access to the RSVP, attendance, and team-assignment stores.
//!
//! The engine never writes through this trait. Every evaluation re-reads
//! current state; nothing is cached or snapshotted between triggers.

use chrono::{DateTime, Utc, Weekday};

use super::domain::{
    Activity, AttendanceView, EventId, EventKind, EventSummary, PersonId, RsvpView,
    TeamAssignmentView,
};

/// Parameters for [`HistoryReader::eligible_rsvps`].
#[derive(Debug, Clone, Default)]
pub struct RsvpFilter {
    /// Restrict to events of these kinds. `None` means any kind.
    pub kinds: Option<Vec<EventKind>>,
    /// Restrict to events that have already started.
    pub only_past: bool,
    /// Restrict to `yes` responses.
    pub only_yes: bool,
    /// Row cap, applied after ordering. `None` means unbounded.
    pub max_rows: Option<usize>,
}

impl RsvpFilter {
    /// All of a member's `yes` responses, any kind, most recent event first.
    pub fn all_yes() -> Self {
        Self {
            only_yes: true,
            ..Self::default()
        }
    }

    /// Past `yes` responses on attendance-eligible kinds, uncapped. The
    /// caller still filters late cancellations where the rule requires it.
    pub fn attended_sessions() -> Self {
        Self {
            kinds: Some(EventKind::ATTENDANCE_ELIGIBLE.to_vec()),
            only_past: true,
            only_yes: true,
            max_rows: None,
        }
    }
}

/// Errors surfaced by the backing stores.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
    #[error("history query failed: {0}")]
    Query(String),
}

/// Abstraction over the club's event-history stores.
///
/// Implementations return ordered collections; no method mutates source
/// data. Row-bounded queries keep per-invocation cost constant.
pub trait HistoryReader: Send + Sync {
    /// A member's RSVPs joined with their events, ordered by event start
    /// time descending.
    fn eligible_rsvps(
        &self,
        person: &PersonId,
        filter: &RsvpFilter,
    ) -> Result<Vec<RsvpView>, HistoryError>;

    /// Every member's `yes` RSVPs on one event, ordered by response time
    /// ascending.
    fn event_yes_rsvps(&self, event: &EventId) -> Result<Vec<RsvpView>, HistoryError>;

    /// All events of the given kinds, used for pattern denominators.
    fn events(
        &self,
        kinds: &[EventKind],
        only_past: bool,
    ) -> Result<Vec<EventSummary>, HistoryError>;

    /// A member's attendance records for events falling on one weekday.
    fn attendance_on_weekday(
        &self,
        person: &PersonId,
        weekday: Weekday,
    ) -> Result<Vec<AttendanceView>, HistoryError>;

    /// A member's team assignments for one activity, ordered by assignment
    /// time ascending.
    fn team_assignments(
        &self,
        person: &PersonId,
        activity: Activity,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError>;

    /// Every team assignment recorded against one event.
    fn team_assignments_for_event(
        &self,
        event: &EventId,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError>;

    /// Whether the person holds a captain role in any group.
    fn has_captain_role(&self, person: &PersonId) -> Result<bool, HistoryError>;

    /// Members with at least one eligible RSVP since `since`.
    fn recently_active(&self, since: DateTime<Utc>) -> Result<Vec<PersonId>, HistoryError>;
}
