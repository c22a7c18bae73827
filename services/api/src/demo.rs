use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Args;

use club_awards::awards::{
    catalog, definition, Activity, AttendanceContext, AttendanceStatus, AwardEngine, EventId,
    EventKind, EventSummary, GrantLedger, PersonId, Position, RsvpContext, RsvpResponse,
    RsvpView, TeamAssignmentView, TeamContext, Trigger,
};
use club_awards::error::AppError;

use crate::infra::{InMemoryGrantLedger, InMemoryHistoryStore};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Member name used for the seeded history
    #[arg(long, default_value = "alex")]
    pub(crate) member: String,
    /// Weeks of attended session history to seed
    #[arg(long, default_value_t = 12)]
    pub(crate) weeks: u32,
}

/// Seed one member's history, walk every trigger kind through the engine,
/// and print what each pass granted.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let history = Arc::new(InMemoryHistoryStore::default());
    let ledger = Arc::new(InMemoryGrantLedger::default());
    let engine = AwardEngine::new(history.clone(), ledger.clone());

    let member = PersonId(args.member.clone());
    let captain = PersonId("captain-morgan".to_string());
    history.record_captain(&captain);
    let now = Utc::now();

    println!("Award engine demo for '{}'", args.member);

    // A run of weekly sessions, all attended.
    let mut last_session = None;
    for week in 0..args.weeks {
        let start = now - Duration::weeks(i64::from(args.weeks - week));
        let event_id = format!("session-{week}");
        history.record_event(EventSummary {
            event_id: EventId(event_id.clone()),
            kind: Some(EventKind::Session),
            start,
        });
        let view = RsvpView {
            event_id: EventId(event_id.clone()),
            event_kind: Some(EventKind::Session),
            event_start: start,
            event_title: Some(format!("Club session {week}")),
            event_location: Some("Crystal Palace".to_string()),
            event_visible_from: Some(start - Duration::days(14)),
            response: RsvpResponse::Yes,
            responded_at: start - Duration::days(2),
            cancelled_late: false,
        };
        history.record_rsvp(&member, view.clone());
        history.record_attendance(
            &member,
            EventId(event_id.clone()),
            start,
            AttendanceStatus::Present,
        );
        last_session = Some(view);
    }

    if let Some(view) = last_session {
        let rsvp = Trigger::Rsvp(RsvpContext {
            event_id: view.event_id.clone(),
            event_kind: view.event_kind,
            event_start: view.event_start,
            event_title: view.event_title.clone(),
            event_location: view.event_location.clone(),
            response: view.response,
            responded_at: view.responded_at,
        });
        print_pass("rsvp", &engine.evaluate(&member, &rsvp));

        let attendance = Trigger::Attendance(AttendanceContext {
            event_id: view.event_id.clone(),
            event_start: view.event_start,
            status: AttendanceStatus::Present,
        });
        print_pass("attendance", &engine.evaluate(&member, &attendance));
    }

    // An away match assignment made by a captain.
    let match_start = now - Duration::days(3);
    let assignment = TeamAssignmentView {
        event_id: EventId("away-match".to_string()),
        person_id: member.clone(),
        team_id: None,
        team_name: Some("White Sharks".to_string()),
        activity: Activity::Play,
        position: Some(Position::Wing),
        assigned_by: captain.clone(),
        assigned_at: match_start - Duration::days(5),
    };
    history.record_assignment(assignment);
    let team = Trigger::TeamAssigned(TeamContext {
        event_id: EventId("away-match".to_string()),
        team_id: None,
        team_name: Some("White Sharks".to_string()),
        activity: Activity::Play,
        position: Some(Position::Wing),
        assigned_by: captain,
    });
    print_pass("team_assigned", &engine.evaluate(&member, &team));

    print_pass("profile_load", &engine.evaluate(&member, &Trigger::ProfileLoad));

    let report = engine.sweep();
    println!(
        "\nSweep: {} member(s) checked, {} award(s) granted",
        report.checked, report.awarded
    );

    let earned = ledger
        .grants_for(&member)
        .map_err(|err| AppError::Io(std::io::Error::other(err.to_string())))?;
    println!("\n{} of {} catalog awards earned:", earned.len(), catalog().len());
    for grant in &earned {
        let meta = definition(grant.award_id);
        println!("  [{}] {} - {}", grant.award_id, meta.name, meta.description);
    }

    Ok(())
}

fn print_pass(trigger: &str, granted: &[club_awards::awards::AwardId]) {
    if granted.is_empty() {
        println!("{trigger:>14}: no new awards");
    } else {
        let codes: Vec<String> = granted.iter().map(|award| award.to_string()).collect();
        println!("{trigger:>14}: {}", codes.join(", "));
    }
}
