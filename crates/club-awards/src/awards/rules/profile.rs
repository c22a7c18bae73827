//! Rules evaluated when a member opens their profile or awards page.

use chrono::Duration;

use crate::awards::catalog::AwardId;
use crate::awards::domain::GrantMetadata;
use crate::awards::history::{HistoryError, HistoryReader, RsvpFilter};
use crate::awards::ledger::GrantLedger;

use super::RuleContext;

/// Anniversaries are elapsed wall-clock time since the first-ever `yes`
/// RSVP, not calendar years. The longer spans include leap days so a
/// calendar anniversary never lands early.
const ANNIVERSARY_LADDER: [(i64, AwardId); 3] = [
    (365, AwardId::AnniversaryOne),
    (1826, AwardId::AnniversaryFive),
    (3652, AwardId::AnniversaryTen),
];

const FORWARD_PLANNER_TARGET: usize = 20;
const FORWARD_PLANNER_LEAD_HOURS: i64 = 24;
const FIRST_RESPONDER_TARGET: usize = 15;
const FIRST_RESPONDER_WINDOW_HOURS: i64 = 24;
const ROCK_SOLID_TARGET: usize = 25;
const BEDROCK_TARGET: usize = 50;

pub(crate) fn on_profile_load<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    anniversaries(ctx)?;
    reliability(ctx)?;
    Ok(())
}

/// Shared with the scheduled evaluator, which re-runs anniversary checks.
pub(crate) fn anniversaries<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let yes = ctx.history.eligible_rsvps(ctx.person, &RsvpFilter::all_yes())?;
    let Some(first) = yes.iter().map(|rsvp| rsvp.responded_at).min() else {
        return Ok(());
    };

    let elapsed = ctx.now - first;
    for (days, award) in ANNIVERSARY_LADDER {
        if elapsed >= Duration::days(days) {
            ctx.grant(
                award,
                GrantMetadata::auto()
                    .with_notes(format!("first sign-up {}", first.format("%Y-%m-%d"))),
            );
        }
    }

    Ok(())
}

fn reliability<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let yes = ctx.history.eligible_rsvps(ctx.person, &RsvpFilter::all_yes())?;

    let planned_ahead = yes
        .iter()
        .filter(|rsvp| {
            rsvp.event_start - rsvp.responded_at > Duration::hours(FORWARD_PLANNER_LEAD_HOURS)
        })
        .count();
    if planned_ahead >= FORWARD_PLANNER_TARGET {
        ctx.grant(
            AwardId::ForwardPlanner,
            GrantMetadata::auto().with_notes(format!("{planned_ahead} sign-ups a day or more ahead")),
        );
    }

    let quick_responses = yes
        .iter()
        .filter(|rsvp| match rsvp.event_visible_from {
            Some(visible_from) => {
                let delay = rsvp.responded_at - visible_from;
                delay >= Duration::zero()
                    && delay <= Duration::hours(FIRST_RESPONDER_WINDOW_HOURS)
            }
            None => false,
        })
        .count();
    if quick_responses >= FIRST_RESPONDER_TARGET {
        ctx.grant(
            AwardId::FirstResponder,
            GrantMetadata::auto().with_notes(format!("{quick_responses} same-day sign-ups")),
        );
    }

    // Both tiers require a spotless record: no late cancellation anywhere
    // in the member's history.
    let never_cancelled_late = yes.iter().all(|rsvp| !rsvp.cancelled_late);
    if never_cancelled_late {
        let attended = ctx
            .history
            .eligible_rsvps(ctx.person, &RsvpFilter::attended_sessions())?;
        let sessions = attended.iter().filter(|rsvp| !rsvp.cancelled_late).count();
        if sessions >= ROCK_SOLID_TARGET {
            ctx.grant(
                AwardId::RockSolid,
                GrantMetadata::auto().with_notes(format!("{sessions} sessions, no late cancels")),
            );
        }
        if sessions >= BEDROCK_TARGET {
            ctx.grant(
                AwardId::Bedrock,
                GrantMetadata::auto().with_notes(format!("{sessions} sessions, no late cancels")),
            );
        }
    }

    Ok(())
}
