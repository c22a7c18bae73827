//! Rules evaluated when a member is assigned to a team to play.

use crate::awards::catalog::AwardId;
use crate::awards::domain::{Activity, GrantMetadata, Position, TeamAssignmentView, TeamContext};
use crate::awards::history::{HistoryError, HistoryReader};
use crate::awards::ledger::GrantLedger;

use super::RuleContext;

const TEAM_LOYALTY_TARGET: usize = 5;
const POSITION_LOYALTY_TARGET: usize = 10;
const WHITE: &str = "white";
const BLACK: &str = "black";

pub(crate) fn on_team_assigned<H, L>(
    ctx: &mut RuleContext<'_, H, L>,
    team: &TeamContext,
) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if team.activity != Activity::Play {
        return Ok(());
    }

    let assignments = ctx.history.team_assignments(ctx.person, Activity::Play)?;

    colour_loyalty(ctx, team, &assignments);
    captains_pick(ctx, team)?;
    position_history(ctx, &assignments);

    Ok(())
}

fn team_matches(name: Option<&str>, colour: &str) -> bool {
    name.map(|name| name.to_lowercase().contains(colour))
        .unwrap_or(false)
}

fn colour_loyalty<H, L>(
    ctx: &mut RuleContext<'_, H, L>,
    team: &TeamContext,
    assignments: &[TeamAssignmentView],
) where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let white = assignments
        .iter()
        .filter(|assignment| team_matches(assignment.team_name.as_deref(), WHITE))
        .count();
    if white >= TEAM_LOYALTY_TARGET {
        ctx.grant(
            AwardId::TeamWhite,
            GrantMetadata::auto().with_notes(format!("{white} white-team outings")),
        );
    }

    let black = assignments
        .iter()
        .filter(|assignment| team_matches(assignment.team_name.as_deref(), BLACK))
        .count();
    if black >= TEAM_LOYALTY_TARGET {
        ctx.grant(
            AwardId::TeamBlack,
            GrantMetadata::auto().with_notes(format!("{black} black-team outings")),
        );
    }

    let name = team.team_name.as_deref();
    if name.is_some() && !team_matches(name, WHITE) && !team_matches(name, BLACK) {
        ctx.grant(
            AwardId::ThirdTeam,
            GrantMetadata::for_event(team.event_id.clone()),
        );
    }
}

/// The first assignment recorded against the event, made by someone holding
/// a captain role. The trigger fires after the assignment row exists, so a
/// single recorded row means this one opened the sheet.
fn captains_pick<H, L>(
    ctx: &mut RuleContext<'_, H, L>,
    team: &TeamContext,
) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if ctx.already_granted(AwardId::CaptainsPick) {
        return Ok(());
    }

    let recorded = ctx.history.team_assignments_for_event(&team.event_id)?;
    if recorded.len() != 1 {
        return Ok(());
    }

    if ctx.history.has_captain_role(&team.assigned_by)? {
        ctx.grant(
            AwardId::CaptainsPick,
            GrantMetadata::for_event(team.event_id.clone())
                .with_notes(format!("picked by {}", team.assigned_by)),
        );
    }

    Ok(())
}

fn position_history<H, L>(ctx: &mut RuleContext<'_, H, L>, assignments: &[TeamAssignmentView])
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let mut covered = 0;
    for position in Position::ALL {
        let outings = assignments
            .iter()
            .filter(|assignment| assignment.position == Some(position))
            .count();
        if outings > 0 {
            covered += 1;
        }
        if outings >= POSITION_LOYALTY_TARGET {
            ctx.grant(
                AwardId::for_position(position),
                GrantMetadata::auto().with_notes(format!("{outings} outings")),
            );
        }
    }

    if covered == Position::ALL.len() {
        ctx.grant(AwardId::UtilityPlayer, GrantMetadata::auto());
    }
}
