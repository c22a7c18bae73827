//! Rules evaluated on the scheduled tick (and via the bulk sweep).

use chrono::Datelike;

use crate::awards::catalog::AwardId;
use crate::awards::domain::GrantMetadata;
use crate::awards::history::{HistoryError, HistoryReader, RsvpFilter};
use crate::awards::ledger::GrantLedger;
use crate::awards::patterns;

use super::{profile, RuleContext};

/// Calendar months making up the spring/summer window (March-August).
const SUMMER_WINDOW_MONTHS: std::ops::RangeInclusive<u32> = 3..=8;
const SUMMER_SPLASH_TARGET: usize = 10;

pub(crate) fn on_scheduled<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    profile::anniversaries(ctx)?;
    summer_splash(ctx)?;
    century_season(ctx)?;
    Ok(())
}

/// Only evaluated while "now" falls inside the window; sessions attended in
/// the window of the current year count toward the target.
fn summer_splash<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if !SUMMER_WINDOW_MONTHS.contains(&ctx.now.month()) {
        return Ok(());
    }
    if ctx.already_granted(AwardId::SummerSplash) {
        return Ok(());
    }

    let attended = ctx
        .history
        .eligible_rsvps(ctx.person, &RsvpFilter::attended_sessions())?;
    let in_window = attended
        .iter()
        .filter(|rsvp| !rsvp.cancelled_late)
        .filter(|rsvp| {
            rsvp.event_start.year() == ctx.now.year()
                && SUMMER_WINDOW_MONTHS.contains(&rsvp.event_start.month())
        })
        .count();

    if in_window >= SUMMER_SPLASH_TARGET {
        ctx.grant(
            AwardId::SummerSplash,
            GrantMetadata::auto().with_notes(format!("{in_window} sessions this summer")),
        );
    }

    Ok(())
}

fn century_season<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if ctx.already_granted(AwardId::SeasonCenturion) {
        return Ok(());
    }

    let snapshot = patterns::snapshot(ctx.history, ctx.person)?;
    if patterns::has_century_season(&snapshot) {
        ctx.grant(AwardId::SeasonCenturion, GrantMetadata::auto());
    }

    Ok(())
}
