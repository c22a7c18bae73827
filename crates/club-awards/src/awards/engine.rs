//! Trigger dispatch and the bulk sweep.
//!
//! The dispatcher is a stateless router, not a state machine: nothing
//! persists between invocations except the backing stores, and concurrent
//! invocations for the same member are safe because the grant ledger's
//! insert-if-absent is atomic. No per-person locking exists or is needed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::catalog::AwardId;
use super::domain::{PersonId, Trigger};
use super::history::HistoryReader;
use super::ledger::GrantLedger;
use super::rules::{self, RuleContext};

/// Default lookback for the sweep's definition of an active member.
pub const DEFAULT_ACTIVE_WINDOW_DAYS: i64 = 90;

/// Outcome of one bulk sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Members evaluated.
    pub checked: usize,
    /// Awards granted across all of them.
    pub awarded: usize,
}

/// The award rule engine: routes a trigger to its evaluators, always runs
/// the milestone check, and reports which awards this call granted.
pub struct AwardEngine<H, L> {
    history: Arc<H>,
    ledger: Arc<L>,
    active_window_days: i64,
}

impl<H, L> AwardEngine<H, L>
where
    H: HistoryReader + 'static,
    L: GrantLedger + 'static,
{
    pub fn new(history: Arc<H>, ledger: Arc<L>) -> Self {
        Self {
            history,
            ledger,
            active_window_days: DEFAULT_ACTIVE_WINDOW_DAYS,
        }
    }

    /// Override the sweep's active-member lookback.
    pub fn with_active_window(mut self, days: i64) -> Self {
        self.active_window_days = days;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Evaluate a trigger against the member's current history. Never
    /// fails: evaluator errors are logged and the remaining checks still
    /// run, so the worst case is an empty grant list.
    pub fn evaluate(&self, person: &PersonId, trigger: &Trigger) -> Vec<AwardId> {
        self.evaluate_at(person, trigger, Utc::now())
    }

    /// [`evaluate`](Self::evaluate) with an explicit clock, for callers
    /// that already hold "now" and for deterministic tests.
    pub fn evaluate_at(
        &self,
        person: &PersonId,
        trigger: &Trigger,
        now: DateTime<Utc>,
    ) -> Vec<AwardId> {
        let mut granted = Vec::new();
        let mut ctx = RuleContext {
            history: self.history.as_ref(),
            ledger: self.ledger.as_ref(),
            person,
            now,
            granted: &mut granted,
        };

        let outcome = match trigger {
            Trigger::Rsvp(rsvp) => rules::rsvp::on_rsvp(&mut ctx, rsvp),
            Trigger::Attendance(attendance) => rules::attendance::on_attendance(&mut ctx, attendance),
            Trigger::TeamAssigned(team) => rules::team::on_team_assigned(&mut ctx, team),
            Trigger::ProfileLoad => rules::profile::on_profile_load(&mut ctx),
            Trigger::Scheduled => rules::scheduled::on_scheduled(&mut ctx),
        };
        if let Err(err) = outcome {
            warn!(
                person = %person,
                trigger = trigger.kind_label(),
                %err,
                "evaluator failed; no grants from it this call"
            );
        }

        // Milestones run on every trigger, even when the evaluator above
        // failed.
        if let Err(err) = rules::milestones::check(&mut ctx) {
            warn!(person = %person, %err, "milestone check failed");
        }

        if !granted.is_empty() {
            info!(
                person = %person,
                trigger = trigger.kind_label(),
                awards = ?granted,
                "awards granted"
            );
        }

        granted
    }

    /// Re-evaluate every recently-active member with the scheduled trigger.
    /// Ordering is immaterial: per-person idempotency does not depend on it.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let since = now - Duration::days(self.active_window_days);
        let members = match self.history.recently_active(since) {
            Ok(members) => members,
            Err(err) => {
                warn!(%err, "sweep could not list active members");
                return SweepReport::default();
            }
        };

        let mut report = SweepReport::default();
        for person in &members {
            let granted = self.evaluate_at(person, &Trigger::Scheduled, now);
            report.checked += 1;
            report.awarded += granted.len();
        }

        info!(
            checked = report.checked,
            awarded = report.awarded,
            "bulk sweep complete"
        );
        report
    }
}
