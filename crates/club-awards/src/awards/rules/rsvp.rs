//! Rules evaluated when a member RSVPs `yes` to an event.

use chrono::Duration;

use crate::awards::catalog::{AwardId, STREAK_LADDER};
use crate::awards::domain::{EventKind, GrantMetadata, RsvpContext, RsvpResponse};
use crate::awards::history::{HistoryError, HistoryReader, RsvpFilter};
use crate::awards::ledger::GrantLedger;
use crate::awards::{patterns, streak};

use super::RuleContext;

/// Curated home-area strings. A venue whose location mentions none of these
/// counts as an away trip. Known-fragile heuristic: venues missing from the
/// list are misclassified silently.
const HOME_LOCATIONS: &[&str] = &[
    "london",
    "crystal palace",
    "beckenham",
    "dulwich",
    "brixton",
    "clapham",
    "streatham",
];

/// Curated UK place-name strings, same caveat as [`HOME_LOCATIONS`].
const UK_PLACES: &[&str] = &[
    "london",
    "manchester",
    "birmingham",
    "leeds",
    "sheffield",
    "liverpool",
    "bristol",
    "nottingham",
    "newcastle",
    "brighton",
    "southampton",
    "coventry",
    "cardiff",
    "swansea",
    "glasgow",
    "edinburgh",
    "aberdeen",
    "belfast",
];

const BIG_STAGE_KEYWORDS: &[&str] = &["boa", "final", "national"];

const THIRTEENTH_PLAYER_PRIOR: usize = 12;
const FULL_BENCH_TARGET: usize = 24;
const EARLY_BIRD_LEAD_DAYS: i64 = 7;
const LAST_MINUTE_WINDOW_HOURS: i64 = 2;

pub(crate) fn on_rsvp<H, L>(
    ctx: &mut RuleContext<'_, H, L>,
    rsvp: &RsvpContext,
) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if rsvp.response != RsvpResponse::Yes {
        return Ok(());
    }

    firsts(ctx, rsvp)?;
    event_crowd(ctx, rsvp)?;
    location_heuristics(ctx, rsvp);
    title_keywords(ctx, rsvp);
    timing(ctx, rsvp);
    streak_thresholds(ctx)?;
    pattern_awards(ctx)?;

    Ok(())
}

/// First-ever and first-of-kind sign-ups. The trigger fires after the RSVP
/// row exists, so "first" means the history now counts exactly one. Under
/// concurrent duplicate submissions this count is not atomic with the insert
/// being counted; the ledger still collapses the award to one row.
fn firsts<H, L>(ctx: &mut RuleContext<'_, H, L>, rsvp: &RsvpContext) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let all_yes = ctx.history.eligible_rsvps(ctx.person, &RsvpFilter::all_yes())?;

    if all_yes.len() == 1 {
        ctx.grant(
            AwardId::FirstDip,
            GrantMetadata::for_event(rsvp.event_id.clone()).with_notes("first ever sign-up"),
        );
    }

    let first_of_kind = match rsvp.event_kind {
        Some(EventKind::Match) => Some((EventKind::Match, AwardId::FirstMatch)),
        Some(EventKind::Tournament) => Some((EventKind::Tournament, AwardId::FirstTournament)),
        _ => None,
    };
    if let Some((kind, award)) = first_of_kind {
        let of_kind = all_yes
            .iter()
            .filter(|other| other.event_kind == Some(kind))
            .count();
        if of_kind == 1 {
            ctx.grant(award, GrantMetadata::for_event(rsvp.event_id.clone()));
        }
    }

    Ok(())
}

/// Sign-up crowd sizes on the event itself: the thirteenth name on the
/// sheet, and a bench of twenty-four or more counting this response.
fn event_crowd<H, L>(
    ctx: &mut RuleContext<'_, H, L>,
    rsvp: &RsvpContext,
) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let event_yes = ctx.history.event_yes_rsvps(&rsvp.event_id)?;
    let solid: Vec<_> = event_yes
        .iter()
        .filter(|other| !other.cancelled_late)
        .collect();

    let before_this = solid
        .iter()
        .filter(|other| other.responded_at < rsvp.responded_at)
        .count();
    if before_this == THIRTEENTH_PLAYER_PRIOR {
        ctx.grant(
            AwardId::ThirteenthPlayer,
            GrantMetadata::for_event(rsvp.event_id.clone()),
        );
    }

    if solid.len() >= FULL_BENCH_TARGET {
        ctx.grant(
            AwardId::FullBench,
            GrantMetadata::for_event(rsvp.event_id.clone()),
        );
    }

    Ok(())
}

fn location_heuristics<H, L>(ctx: &mut RuleContext<'_, H, L>, rsvp: &RsvpContext)
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let Some(location) = &rsvp.event_location else {
        return;
    };
    let lowered = location.to_lowercase();

    if !HOME_LOCATIONS.iter().any(|home| lowered.contains(home)) {
        ctx.grant(
            AwardId::RoadTrip,
            GrantMetadata::for_event(rsvp.event_id.clone()).with_notes(location.clone()),
        );
    }

    if !UK_PLACES.iter().any(|place| lowered.contains(place)) {
        ctx.grant(
            AwardId::InternationalWaters,
            GrantMetadata::for_event(rsvp.event_id.clone()).with_notes(location.clone()),
        );
    }
}

fn title_keywords<H, L>(ctx: &mut RuleContext<'_, H, L>, rsvp: &RsvpContext)
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let Some(title) = &rsvp.event_title else {
        return;
    };
    let lowered = title.to_lowercase();

    if lowered.contains("camp") {
        ctx.grant(
            AwardId::CampSpirit,
            GrantMetadata::for_event(rsvp.event_id.clone()),
        );
    }

    if BIG_STAGE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        ctx.grant(
            AwardId::BigStage,
            GrantMetadata::for_event(rsvp.event_id.clone()),
        );
    }
}

/// Lead-time awards. Early bird needs strictly more than seven days; the
/// last-minute window is inclusive at two hours and excludes responses at
/// or after the start.
fn timing<H, L>(ctx: &mut RuleContext<'_, H, L>, rsvp: &RsvpContext)
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let lead = rsvp.event_start - rsvp.responded_at;

    if lead > Duration::days(EARLY_BIRD_LEAD_DAYS) {
        ctx.grant(
            AwardId::EarlyBird,
            GrantMetadata::for_event(rsvp.event_id.clone()),
        );
    }

    if lead > Duration::zero() && lead <= Duration::hours(LAST_MINUTE_WINDOW_HOURS) {
        ctx.grant(
            AwardId::LastMinuteHero,
            GrantMetadata::for_event(rsvp.event_id.clone()),
        );
    }
}

fn streak_thresholds<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let streak = streak::current_streak(ctx.history, ctx.person)?;
    for (threshold, award) in STREAK_LADDER {
        if streak >= threshold {
            ctx.grant(
                award,
                GrantMetadata::auto().with_notes(format!("streak of {streak}")),
            );
        }
    }
    Ok(())
}

fn pattern_awards<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let candidates = [
        AwardId::PerfectWeek,
        AwardId::UnbrokenMonth,
        AwardId::StreakSaver,
    ];
    if candidates.iter().all(|award| ctx.already_granted(*award)) {
        return Ok(());
    }

    let snapshot = patterns::snapshot(ctx.history, ctx.person)?;

    if patterns::has_perfect_week(&snapshot) {
        ctx.grant(AwardId::PerfectWeek, GrantMetadata::auto());
    }
    if patterns::has_unbroken_month(&snapshot) {
        ctx.grant(AwardId::UnbrokenMonth, GrantMetadata::auto());
    }
    if patterns::has_streak_saver(&snapshot) {
        ctx.grant(AwardId::StreakSaver, GrantMetadata::auto());
    }

    Ok(())
}
