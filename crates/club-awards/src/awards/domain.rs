use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for a club member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub String);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for a club event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Identifier wrapper for a team within an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub String);

/// Category of a club event, as recorded by the events store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Session,
    Training,
    LadiesSession,
    Match,
    Tournament,
    Social,
}

impl EventKind {
    /// Kinds that count toward streaks, milestones, and temporal patterns.
    pub const ATTENDANCE_ELIGIBLE: [EventKind; 3] =
        [EventKind::Session, EventKind::Training, EventKind::LadiesSession];

    pub fn is_attendance_eligible(self) -> bool {
        Self::ATTENDANCE_ELIGIBLE.contains(&self)
    }
}

/// A member's answer to an event invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpResponse {
    Yes,
    No,
    Maybe,
}

/// Check-in status recorded against an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn counts_as_attended(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// What a member was assigned to do at an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Play,
    SwimSets,
    NotPlaying,
    Other,
}

/// Playing positions tracked by team assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    CentreBack,
    CentreForward,
    Wing,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::CentreBack,
        Position::CentreForward,
        Position::Wing,
    ];
}

/// A member's RSVP joined with the event it answers.
///
/// Event fields come from the join and may be absent when the source row is
/// incomplete; rules that depend on a missing field treat themselves as not
/// applicable rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpView {
    pub event_id: EventId,
    pub event_kind: Option<EventKind>,
    pub event_start: DateTime<Utc>,
    pub event_title: Option<String>,
    pub event_location: Option<String>,
    /// When the event first became visible to members.
    pub event_visible_from: Option<DateTime<Utc>>,
    pub response: RsvpResponse,
    pub responded_at: DateTime<Utc>,
    /// Set when the member withdrew close enough to start to break
    /// continuity metrics.
    pub cancelled_late: bool,
}

impl RsvpView {
    pub fn attended(&self) -> bool {
        self.response == RsvpResponse::Yes && !self.cancelled_late
    }
}

/// Bare event row used for pattern denominators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: EventId,
    pub kind: Option<EventKind>,
    pub start: DateTime<Utc>,
}

/// A member's check-in record for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceView {
    pub event_id: EventId,
    pub status: AttendanceStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// A team assignment joined with its team row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignmentView {
    pub event_id: EventId,
    pub person_id: PersonId,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
    pub activity: Activity,
    pub position: Option<Position>,
    pub assigned_by: PersonId,
    pub assigned_at: DateTime<Utc>,
}

/// How a grant came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    Auto,
    Manual,
}

/// Caller-supplied context stored alongside a grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantMetadata {
    pub source: GrantSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GrantMetadata {
    pub fn auto() -> Self {
        Self {
            source: GrantSource::Auto,
            event_id: None,
            notes: None,
        }
    }

    pub fn for_event(event_id: EventId) -> Self {
        Self {
            source: GrantSource::Auto,
            event_id: Some(event_id),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Identifier for a stored grant row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantId(pub String);

/// A recorded grant. Rows are never updated or deleted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonAward {
    pub id: GrantId,
    pub person_id: PersonId,
    pub award_id: crate::awards::catalog::AwardId,
    pub source: GrantSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub awarded_at: DateTime<Utc>,
}

/// Context delivered with an RSVP trigger. Fires only for `yes` responses;
/// the dispatcher still receives the response so the evaluator can gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpContext {
    pub event_id: EventId,
    pub event_kind: Option<EventKind>,
    pub event_start: DateTime<Utc>,
    pub event_title: Option<String>,
    pub event_location: Option<String>,
    pub response: RsvpResponse,
    pub responded_at: DateTime<Utc>,
}

/// Context delivered with an attendance trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceContext {
    pub event_id: EventId,
    pub event_start: DateTime<Utc>,
    pub status: AttendanceStatus,
}

/// Context delivered with a team-assignment trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamContext {
    pub event_id: EventId,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
    pub activity: Activity,
    pub position: Option<Position>,
    pub assigned_by: PersonId,
}

/// External actions that cause rule evaluation, one variant per trigger
/// kind, each carrying exactly the fields its evaluators need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    Rsvp(RsvpContext),
    Attendance(AttendanceContext),
    TeamAssigned(TeamContext),
    ProfileLoad,
    Scheduled,
}

impl Trigger {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Trigger::Rsvp(_) => "rsvp",
            Trigger::Attendance(_) => "attendance",
            Trigger::TeamAssigned(_) => "team_assigned",
            Trigger::ProfileLoad => "profile_load",
            Trigger::Scheduled => "scheduled",
        }
    }
}
