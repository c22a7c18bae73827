//! The achievement rule engine: trigger dispatch, rule predicates,
//! streak/temporal-pattern detection, and the idempotent grant ledger.
//!
//! The engine only reads RSVP, attendance, and team data (through
//! [`HistoryReader`]) and only writes grant rows (through [`GrantLedger`]).
//! Everything else (notifications, revocation, the badge page) lives
//! outside this module.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod history;
pub mod ledger;
pub(crate) mod patterns;
pub mod router;
pub(crate) mod rules;
pub mod streak;

#[cfg(test)]
mod tests;

pub use catalog::{catalog, definition, AwardDefinition, AwardId, MILESTONE_LADDER, STREAK_LADDER};
pub use domain::{
    Activity, AttendanceContext, AttendanceStatus, AttendanceView, EventId, EventKind,
    EventSummary, GrantId, GrantMetadata, GrantSource, PersonAward, PersonId, Position,
    RsvpContext, RsvpResponse, RsvpView, TeamAssignmentView, TeamContext, TeamId, Trigger,
};
pub use engine::{AwardEngine, SweepReport, DEFAULT_ACTIVE_WINDOW_DAYS};
pub use history::{HistoryError, HistoryReader, RsvpFilter};
pub use ledger::{GrantLedger, LedgerError};
pub use router::awards_router;
pub use streak::{current_streak, STREAK_SCAN_CAP};
