//! Per-trigger rule evaluators.
//!
//! Every rule follows the same shape: query history, test the predicate,
//! and hand any newly-satisfied award to [`RuleContext::grant`]. Rules check
//! `has_grant` before expensive work where practical, but idempotency is the
//! ledger's job, not theirs.

pub(crate) mod attendance;
pub(crate) mod milestones;
pub(crate) mod profile;
pub(crate) mod rsvp;
pub(crate) mod scheduled;
pub(crate) mod team;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::catalog::AwardId;
use super::domain::{GrantMetadata, PersonId};
use super::history::HistoryReader;
use super::ledger::GrantLedger;

/// One evaluation pass for one member: the store handles, the evaluation
/// clock, and the accumulator for award ids granted during this call.
pub(crate) struct RuleContext<'a, H: ?Sized, L: ?Sized> {
    pub history: &'a H,
    pub ledger: &'a L,
    pub person: &'a PersonId,
    pub now: DateTime<Utc>,
    pub granted: &'a mut Vec<AwardId>,
}

impl<'a, H, L> RuleContext<'a, H, L>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    /// Cheap pre-check so rules can skip predicate work for awards the
    /// person already holds. A probe failure reads as "unknown", and the
    /// rule proceeds; the ledger insert stays the source of truth.
    pub fn already_granted(&self, award: AwardId) -> bool {
        match self.ledger.has_grant(self.person, award) {
            Ok(held) => held,
            Err(err) => {
                warn!(person = %self.person, award = %award, %err, "has_grant probe failed");
                false
            }
        }
    }

    /// Record a satisfied award. A lost race or an existing grant is a
    /// silent no-op; a write failure is logged and left for the next
    /// trigger, since re-evaluation is idempotent.
    pub fn grant(&mut self, award: AwardId, metadata: GrantMetadata) {
        if self.already_granted(award) {
            return;
        }
        match self.ledger.insert_if_absent(self.person, award, metadata) {
            Ok(true) => {
                debug!(person = %self.person, award = %award, "award granted");
                self.granted.push(award);
            }
            Ok(false) => {}
            Err(err) => {
                warn!(person = %self.person, award = %award, %err, "grant write failed; will retry on a later trigger");
            }
        }
    }
}
