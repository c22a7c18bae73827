//! Integration scenarios for the award engine, exercised through the public
//! facade only: the dispatcher entry point, the sweep, and the two store
//! traits an embedding service implements.

mod common {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};

    use club_awards::awards::{
        Activity, AttendanceView, AwardId, EventId, EventKind, EventSummary, GrantId,
        GrantLedger, GrantMetadata, HistoryError, HistoryReader, LedgerError, PersonAward,
        PersonId, RsvpFilter, RsvpResponse, RsvpView, TeamAssignmentView,
    };

    pub fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub fn member(id: &str) -> PersonId {
        PersonId(id.to_string())
    }

    pub fn session_yes(event_id: &str, start: DateTime<Utc>) -> RsvpView {
        RsvpView {
            event_id: EventId(event_id.to_string()),
            event_kind: Some(EventKind::Session),
            event_start: start,
            event_title: None,
            event_location: None,
            event_visible_from: None,
            response: RsvpResponse::Yes,
            responded_at: start - Duration::days(2),
            cancelled_late: false,
        }
    }

    /// Minimal history fixture backing the public trait.
    #[derive(Default)]
    pub struct FixtureHistory {
        pub rsvps: Mutex<HashMap<PersonId, Vec<RsvpView>>>,
    }

    impl FixtureHistory {
        pub fn add(&self, person: &PersonId, view: RsvpView) {
            self.rsvps
                .lock()
                .expect("history mutex poisoned")
                .entry(person.clone())
                .or_default()
                .push(view);
        }
    }

    impl HistoryReader for FixtureHistory {
        fn eligible_rsvps(
            &self,
            person: &PersonId,
            filter: &RsvpFilter,
        ) -> Result<Vec<RsvpView>, HistoryError> {
            let guard = self.rsvps.lock().expect("history mutex poisoned");
            let mut rows = guard.get(person).cloned().unwrap_or_default();
            if let Some(kinds) = &filter.kinds {
                rows.retain(|row| {
                    row.event_kind
                        .map(|kind| kinds.contains(&kind))
                        .unwrap_or(false)
                });
            }
            if filter.only_past {
                rows.retain(|row| row.event_start <= reference_now());
            }
            if filter.only_yes {
                rows.retain(|row| row.response == RsvpResponse::Yes);
            }
            rows.sort_by(|a, b| b.event_start.cmp(&a.event_start));
            if let Some(cap) = filter.max_rows {
                rows.truncate(cap);
            }
            Ok(rows)
        }

        fn event_yes_rsvps(&self, event: &EventId) -> Result<Vec<RsvpView>, HistoryError> {
            let guard = self.rsvps.lock().expect("history mutex poisoned");
            let mut rows: Vec<RsvpView> = guard
                .values()
                .flatten()
                .filter(|row| &row.event_id == event && row.response == RsvpResponse::Yes)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.responded_at.cmp(&b.responded_at));
            Ok(rows)
        }

        fn events(
            &self,
            _kinds: &[EventKind],
            _only_past: bool,
        ) -> Result<Vec<EventSummary>, HistoryError> {
            Ok(Vec::new())
        }

        fn attendance_on_weekday(
            &self,
            _person: &PersonId,
            _weekday: Weekday,
        ) -> Result<Vec<AttendanceView>, HistoryError> {
            Ok(Vec::new())
        }

        fn team_assignments(
            &self,
            _person: &PersonId,
            _activity: Activity,
        ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
            Ok(Vec::new())
        }

        fn team_assignments_for_event(
            &self,
            _event: &EventId,
        ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
            Ok(Vec::new())
        }

        fn has_captain_role(&self, _person: &PersonId) -> Result<bool, HistoryError> {
            Ok(false)
        }

        fn recently_active(&self, since: DateTime<Utc>) -> Result<Vec<PersonId>, HistoryError> {
            let guard = self.rsvps.lock().expect("history mutex poisoned");
            let mut members: Vec<PersonId> = guard
                .iter()
                .filter(|(_, rows)| rows.iter().any(|row| row.responded_at >= since))
                .map(|(person, _)| person.clone())
                .collect();
            members.sort();
            Ok(members)
        }
    }

    /// Mutex-backed ledger with atomic check-and-insert.
    #[derive(Default)]
    pub struct FixtureLedger {
        grants: Mutex<HashMap<(PersonId, AwardId), PersonAward>>,
        sequence: AtomicU64,
    }

    impl FixtureLedger {
        pub fn count_for(&self, person: &PersonId, award: AwardId) -> usize {
            let guard = self.grants.lock().expect("ledger mutex poisoned");
            guard
                .values()
                .filter(|row| &row.person_id == person && row.award_id == award)
                .count()
        }
    }

    impl GrantLedger for FixtureLedger {
        fn has_grant(&self, person: &PersonId, award: AwardId) -> Result<bool, LedgerError> {
            let guard = self.grants.lock().expect("ledger mutex poisoned");
            Ok(guard.contains_key(&(person.clone(), award)))
        }

        fn insert_if_absent(
            &self,
            person: &PersonId,
            award: AwardId,
            metadata: GrantMetadata,
        ) -> Result<bool, LedgerError> {
            let mut guard = self.grants.lock().expect("ledger mutex poisoned");
            let key = (person.clone(), award);
            if guard.contains_key(&key) {
                return Ok(false);
            }
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            guard.insert(
                key,
                PersonAward {
                    id: GrantId(format!("grant-{sequence:06}")),
                    person_id: person.clone(),
                    award_id: award,
                    source: metadata.source,
                    event_id: metadata.event_id,
                    notes: metadata.notes,
                    awarded_at: Utc::now(),
                },
            );
            Ok(true)
        }

        fn grants_for(&self, person: &PersonId) -> Result<Vec<PersonAward>, LedgerError> {
            let guard = self.grants.lock().expect("ledger mutex poisoned");
            let mut rows: Vec<PersonAward> = guard
                .values()
                .filter(|row| &row.person_id == person)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.id.0.cmp(&b.id.0));
            Ok(rows)
        }
    }

    pub fn build() -> (
        club_awards::awards::AwardEngine<FixtureHistory, FixtureLedger>,
        Arc<FixtureHistory>,
        Arc<FixtureLedger>,
    ) {
        let history = Arc::new(FixtureHistory::default());
        let ledger = Arc::new(FixtureLedger::default());
        let engine = club_awards::awards::AwardEngine::new(history.clone(), ledger.clone());
        (engine, history, ledger)
    }
}

use std::sync::Arc;
use std::thread;

use chrono::Duration;

use club_awards::awards::{AwardId, GrantLedger, RsvpContext, Trigger};
use common::*;

fn context_for(view: &club_awards::awards::RsvpView) -> RsvpContext {
    RsvpContext {
        event_id: view.event_id.clone(),
        event_kind: view.event_kind,
        event_start: view.event_start,
        event_title: view.event_title.clone(),
        event_location: view.event_location.clone(),
        response: view.response,
        responded_at: view.responded_at,
    }
}

#[test]
fn a_new_member_journey_grants_each_award_once() {
    let (engine, history, ledger) = build();
    let joiner = member("joiner");

    // First sign-up: first dip, nothing else.
    let first = session_yes("s0", reference_now() - Duration::weeks(5));
    history.add(&joiner, first.clone());
    let granted = engine.evaluate_at(&joiner, &Trigger::Rsvp(context_for(&first)), reference_now());
    assert!(granted.contains(&AwardId::FirstDip));
    assert!(!granted.contains(&AwardId::MilestoneFive));

    // Four more weekly sessions: the milestone and streak rungs arrive.
    for week in 1..5 {
        let view = session_yes(&format!("s{week}"), reference_now() - Duration::weeks(5 - week));
        history.add(&joiner, view.clone());
        engine.evaluate_at(&joiner, &Trigger::Rsvp(context_for(&view)), reference_now());
    }
    let rows = ledger.grants_for(&joiner).expect("ledger up");
    let held: Vec<AwardId> = rows.iter().map(|row| row.award_id).collect();
    assert!(held.contains(&AwardId::MilestoneFive));
    assert!(held.contains(&AwardId::DoubleUp));
    assert!(held.contains(&AwardId::HatTrick));

    // Replaying the whole journey adds no rows.
    let before = rows.len();
    for week in 0..5 {
        let view = session_yes(&format!("s{week}"), reference_now() - Duration::weeks(5 - week));
        engine.evaluate_at(&joiner, &Trigger::Rsvp(context_for(&view)), reference_now());
    }
    let after = ledger.grants_for(&joiner).expect("ledger up").len();
    assert_eq!(before, after);
}

#[test]
fn profile_and_scheduled_triggers_agree_on_anniversaries() {
    let (engine, history, ledger) = build();
    let veteran = member("veteran");
    let mut first = session_yes("first", reference_now() - Duration::days(2000));
    first.responded_at = reference_now() - Duration::days(2000);
    history.add(&veteran, first);

    let granted = engine.evaluate_at(&veteran, &Trigger::ProfileLoad, reference_now());
    assert!(granted.contains(&AwardId::AnniversaryOne));
    assert!(granted.contains(&AwardId::AnniversaryFive));

    // The scheduled pass re-checks but cannot double-grant.
    let granted = engine.evaluate_at(&veteran, &Trigger::Scheduled, reference_now());
    assert!(!granted.contains(&AwardId::AnniversaryOne));
    assert_eq!(ledger.count_for(&veteran, AwardId::AnniversaryOne), 1);
}

#[test]
fn concurrent_triggers_share_one_grant_row() {
    let (engine, history, ledger) = build();
    let engine = Arc::new(engine);
    let racer = member("racer");
    let view = session_yes("s1", reference_now() - Duration::days(1));
    history.add(&racer, view.clone());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let engine = engine.clone();
            let racer = racer.clone();
            let trigger = Trigger::Rsvp(context_for(&view));
            thread::spawn(move || engine.evaluate_at(&racer, &trigger, reference_now()))
        })
        .collect();

    let reported: usize = handles
        .into_iter()
        .map(|handle| handle.join().expect("evaluation thread panicked"))
        .map(|granted| granted.iter().filter(|award| **award == AwardId::FirstDip).count())
        .sum();

    assert_eq!(reported, 1);
    assert_eq!(ledger.count_for(&racer, AwardId::FirstDip), 1);
}

#[test]
fn sweep_covers_active_members_and_settles() {
    let (engine, history, _ledger) = build();
    for index in 0..3 {
        let id = member(&format!("m{index}"));
        let mut first = session_yes("first", reference_now() - Duration::days(500));
        first.responded_at = reference_now() - Duration::days(500);
        history.add(&id, first);
        history.add(&id, session_yes(&format!("r{index}"), reference_now() - Duration::days(4)));
    }

    let first_run = engine.sweep_at(reference_now());
    assert_eq!(first_run.checked, 3);
    assert!(first_run.awarded >= 3);

    let second_run = engine.sweep_at(reference_now());
    assert_eq!(second_run.checked, 3);
    assert_eq!(second_run.awarded, 0);
}
