//! Rules evaluated when a member is marked present or late.

use chrono::{Datelike, Weekday};

use crate::awards::catalog::AwardId;
use crate::awards::domain::{AttendanceContext, GrantMetadata};
use crate::awards::history::{HistoryError, HistoryReader};
use crate::awards::ledger::GrantLedger;

use super::RuleContext;

const WEEKDAY_REGULAR_TARGET: usize = 10;
const NEW_YEAR_WINDOW_DAYS: u32 = 7;

const TRACKED_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub(crate) fn on_attendance<H, L>(
    ctx: &mut RuleContext<'_, H, L>,
    attendance: &AttendanceContext,
) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    if !attendance.status.counts_as_attended() {
        return Ok(());
    }

    weekday_regulars(ctx)?;
    new_year_splash(ctx, attendance);

    Ok(())
}

/// Each tracked weekday is checked separately; the grant probe keeps the
/// re-checks cheap once a weekday award is held.
fn weekday_regulars<H, L>(ctx: &mut RuleContext<'_, H, L>) -> Result<(), HistoryError>
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    for weekday in TRACKED_WEEKDAYS {
        let award = AwardId::for_weekday(weekday);
        if ctx.already_granted(award) {
            continue;
        }
        let records = ctx.history.attendance_on_weekday(ctx.person, weekday)?;
        let attended = records
            .iter()
            .filter(|record| record.status.counts_as_attended())
            .count();
        if attended >= WEEKDAY_REGULAR_TARGET {
            ctx.grant(
                award,
                GrantMetadata::auto().with_notes(format!("{attended} attendances on {weekday}")),
            );
        }
    }
    Ok(())
}

/// Granted once per person, not once per year.
fn new_year_splash<H, L>(ctx: &mut RuleContext<'_, H, L>, attendance: &AttendanceContext)
where
    H: HistoryReader + ?Sized,
    L: GrantLedger + ?Sized,
{
    let start = attendance.event_start;
    if start.month() == 1 && start.day() <= NEW_YEAR_WINDOW_DAYS {
        ctx.grant(
            AwardId::NewYearSplash,
            GrantMetadata::for_event(attendance.event_id.clone()),
        );
    }
}
