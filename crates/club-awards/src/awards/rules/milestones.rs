//! Lifetime milestone ladder, run on every trigger.

use crate::awards::catalog::MILESTONE_LADDER;
use crate::awards::domain::GrantMetadata;
use crate::awards::history::{HistoryError, HistoryReader, RsvpFilter};
use crate::awards::ledger::GrantLedger;

use super::RuleContext;

pub(crate) fn check<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if MILESTONE_LADDER
        .iter()
        .all(|(_, award)| ctx.already_granted(*award))
    {
        return Ok(());
    }

    let attended = ctx
        .history
        .eligible_rsvps(ctx.person, &RsvpFilter::attended_sessions())?;
    let sessions = attended.iter().filter(|rsvp| !rsvp.cancelled_late).count() as u32;

    for (threshold, award) in MILESTONE_LADDER {
        if sessions >= threshold {
            ctx.grant(
                award,
                GrantMetadata::auto().with_notes(format!("{sessions} sessions attended")),
            );
        }
    }

    Ok(())
}
