use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};

use crate::awards::catalog::AwardId;
use crate::awards::domain::{
    Activity, AttendanceStatus, AttendanceView, EventId, EventKind, EventSummary, GrantId,
    GrantMetadata, PersonAward, PersonId, Position, RsvpContext, RsvpResponse, RsvpView,
    TeamAssignmentView,
};
use crate::awards::engine::AwardEngine;
use crate::awards::history::{HistoryError, HistoryReader, RsvpFilter};
use crate::awards::ledger::{GrantLedger, LedgerError};

/// Reference "now" shared by the fixtures: Wednesday 2025-06-18, midday.
pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 18, 12, 0, 0).single().expect("valid timestamp")
}

pub(super) fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn person(id: &str) -> PersonId {
    PersonId(id.to_string())
}

pub(super) fn event(id: &str) -> EventId {
    EventId(id.to_string())
}

/// A `yes` session RSVP answered two days before the event.
pub(super) fn yes_rsvp(event_id: &str, start: DateTime<Utc>) -> RsvpView {
    RsvpView {
        event_id: event(event_id),
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

pub(super) fn rsvp_context(view: &RsvpView) -> RsvpContext {
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

pub(super) fn assignment(
    person_id: &PersonId,
    event_id: &str,
    team_name: &str,
    position: Option<Position>,
    assigned_at: DateTime<Utc>,
) -> TeamAssignmentView {
    TeamAssignmentView {
        event_id: event(event_id),
        person_id: person_id.clone(),
        team_id: None,
        team_name: Some(team_name.to_string()),
        activity: Activity::Play,
        position,
        assigned_by: person("captain-1"),
        assigned_at,
    }
}

#[derive(Default)]
struct HistoryState {
    rsvps: HashMap<PersonId, Vec<RsvpView>>,
    event_rsvps: HashMap<EventId, Vec<RsvpView>>,
    events: Vec<EventSummary>,
    attendance: HashMap<PersonId, Vec<(Weekday, AttendanceView)>>,
    assignments: Vec<TeamAssignmentView>,
    captains: HashSet<PersonId>,
}

/// In-memory stand-in for the external event-history stores.
#[derive(Clone)]
pub(super) struct MemoryHistory {
    state: Arc<Mutex<HistoryState>>,
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(HistoryState::default())),
            now: Arc::new(Mutex::new(fixed_now())),
        }
    }
}

impl MemoryHistory {
    pub(super) fn set_now(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("history mutex poisoned") = now;
    }

    /// Record a member's RSVP and index it under its event.
    pub(super) fn add_rsvp(&self, person_id: &PersonId, view: RsvpView) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        state
            .event_rsvps
            .entry(view.event_id.clone())
            .or_default()
            .push(view.clone());
        state.rsvps.entry(person_id.clone()).or_default().push(view);
    }

    /// Record another member's `yes` on an event without touching the
    /// person under test.
    pub(super) fn add_other_yes(&self, event_id: &str, view: RsvpView) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        state.event_rsvps.entry(event(event_id)).or_default().push(view);
    }

    pub(super) fn add_event(&self, event_id: &str, kind: EventKind, start: DateTime<Utc>) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        state.events.push(EventSummary {
            event_id: event(event_id),
            kind: Some(kind),
            start,
        });
    }

    pub(super) fn add_attendance(
        &self,
        person_id: &PersonId,
        event_id: &str,
        weekday: Weekday,
        status: AttendanceStatus,
    ) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        state.attendance.entry(person_id.clone()).or_default().push((
            weekday,
            AttendanceView {
                event_id: event(event_id),
                status,
                checked_in_at: None,
            },
        ));
    }

    pub(super) fn add_assignment(&self, view: TeamAssignmentView) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        state.assignments.push(view);
    }

    pub(super) fn add_captain(&self, person_id: &PersonId) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        state.captains.insert(person_id.clone());
    }
}

/// Seed `count` weekly attended sessions ending at `last_start`, creating
/// both the event rows and the member's RSVPs.
pub(super) fn seed_attended_sessions(
    history: &MemoryHistory,
    person_id: &PersonId,
    count: usize,
    last_start: DateTime<Utc>,
) {
    for index in 0..count {
        let start = last_start - Duration::weeks(index as i64);
        let event_id = format!("session-{index}");
        history.add_event(&event_id, EventKind::Session, start);
        history.add_rsvp(person_id, yes_rsvp(&event_id, start));
    }
}

impl HistoryReader for MemoryHistory {
    fn eligible_rsvps(
        &self,
        person_id: &PersonId,
        filter: &RsvpFilter,
    ) -> Result<Vec<RsvpView>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        let now = *self.now.lock().expect("history mutex poisoned");
        let mut rows = state.rsvps.get(person_id).cloned().unwrap_or_default();
        if let Some(kinds) = &filter.kinds {
            rows.retain(|row| row.event_kind.map(|kind| kinds.contains(&kind)).unwrap_or(false));
        }
        if filter.only_past {
            rows.retain(|row| row.event_start <= now);
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

    fn event_yes_rsvps(&self, event_id: &EventId) -> Result<Vec<RsvpView>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        let mut rows: Vec<RsvpView> = state
            .event_rsvps
            .get(event_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| row.response == RsvpResponse::Yes)
            .collect();
        rows.sort_by(|a, b| a.responded_at.cmp(&b.responded_at));
        Ok(rows)
    }

    fn events(
        &self,
        kinds: &[EventKind],
        only_past: bool,
    ) -> Result<Vec<EventSummary>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        let now = *self.now.lock().expect("history mutex poisoned");
        Ok(state
            .events
            .iter()
            .filter(|event| event.kind.map(|kind| kinds.contains(&kind)).unwrap_or(false))
            .filter(|event| !only_past || event.start <= now)
            .cloned()
            .collect())
    }

    fn attendance_on_weekday(
        &self,
        person_id: &PersonId,
        weekday: Weekday,
    ) -> Result<Vec<AttendanceView>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        Ok(state
            .attendance
            .get(person_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|(day, _)| *day == weekday)
                    .map(|(_, record)| record.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn team_assignments(
        &self,
        person_id: &PersonId,
        activity: Activity,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        let mut rows: Vec<TeamAssignmentView> = state
            .assignments
            .iter()
            .filter(|row| &row.person_id == person_id && row.activity == activity)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(rows)
    }

    fn team_assignments_for_event(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        Ok(state
            .assignments
            .iter()
            .filter(|row| &row.event_id == event_id)
            .cloned()
            .collect())
    }

    fn has_captain_role(&self, person_id: &PersonId) -> Result<bool, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        Ok(state.captains.contains(person_id))
    }

    fn recently_active(&self, since: DateTime<Utc>) -> Result<Vec<PersonId>, HistoryError> {
        let state = self.state.lock().expect("history mutex poisoned");
        let mut members: Vec<PersonId> = state
            .rsvps
            .iter()
            .filter(|(_, rows)| rows.iter().any(|row| row.responded_at >= since))
            .map(|(person_id, _)| person_id.clone())
            .collect();
        members.sort();
        Ok(members)
    }
}

/// In-memory grant store. One mutex guards the map, so the existence check
/// and the insert are a single critical section.
#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    grants: Arc<Mutex<HashMap<(PersonId, AwardId), PersonAward>>>,
    sequence: Arc<AtomicU64>,
}

impl GrantLedger for MemoryLedger {
    fn has_grant(&self, person_id: &PersonId, award: AwardId) -> Result<bool, LedgerError> {
        let guard = self.grants.lock().expect("ledger mutex poisoned");
        Ok(guard.contains_key(&(person_id.clone(), award)))
    }

    fn insert_if_absent(
        &self,
        person_id: &PersonId,
        award: AwardId,
        metadata: GrantMetadata,
    ) -> Result<bool, LedgerError> {
        let mut guard = self.grants.lock().expect("ledger mutex poisoned");
        let key = (person_id.clone(), award);
        if guard.contains_key(&key) {
            return Ok(false);
        }
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        guard.insert(
            key,
            PersonAward {
                id: GrantId(format!("grant-{sequence:06}")),
                person_id: person_id.clone(),
                award_id: award,
                source: metadata.source,
                event_id: metadata.event_id,
                notes: metadata.notes,
                awarded_at: Utc::now(),
            },
        );
        Ok(true)
    }

    fn grants_for(&self, person_id: &PersonId) -> Result<Vec<PersonAward>, LedgerError> {
        let guard = self.grants.lock().expect("ledger mutex poisoned");
        let mut rows: Vec<PersonAward> = guard
            .values()
            .filter(|grant| &grant.person_id == person_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(rows)
    }
}

/// History double whose store is down.
pub(super) struct UnavailableHistory;

impl HistoryReader for UnavailableHistory {
    fn eligible_rsvps(
        &self,
        _person: &PersonId,
        _filter: &RsvpFilter,
    ) -> Result<Vec<RsvpView>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn event_yes_rsvps(&self, _event: &EventId) -> Result<Vec<RsvpView>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn events(
        &self,
        _kinds: &[EventKind],
        _only_past: bool,
    ) -> Result<Vec<EventSummary>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn attendance_on_weekday(
        &self,
        _person: &PersonId,
        _weekday: Weekday,
    ) -> Result<Vec<AttendanceView>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn team_assignments(
        &self,
        _person: &PersonId,
        _activity: Activity,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn team_assignments_for_event(
        &self,
        _event: &EventId,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn has_captain_role(&self, _person: &PersonId) -> Result<bool, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }

    fn recently_active(&self, _since: DateTime<Utc>) -> Result<Vec<PersonId>, HistoryError> {
        Err(HistoryError::Unavailable("history offline".to_string()))
    }
}

/// Ledger double whose writes always fail.
pub(super) struct FailingLedger;

impl GrantLedger for FailingLedger {
    fn has_grant(&self, _person: &PersonId, _award: AwardId) -> Result<bool, LedgerError> {
        Ok(false)
    }

    fn insert_if_absent(
        &self,
        _person: &PersonId,
        _award: AwardId,
        _metadata: GrantMetadata,
    ) -> Result<bool, LedgerError> {
        Err(LedgerError::Write("grant store offline".to_string()))
    }

    fn grants_for(&self, _person: &PersonId) -> Result<Vec<PersonAward>, LedgerError> {
        Ok(Vec::new())
    }
}

pub(super) fn build_engine() -> (
    AwardEngine<MemoryHistory, MemoryLedger>,
    Arc<MemoryHistory>,
    Arc<MemoryLedger>,
) {
    let history = Arc::new(MemoryHistory::default());
    let ledger = Arc::new(MemoryLedger::default());
    let engine = AwardEngine::new(history.clone(), ledger.clone());
    (engine, history, ledger)
}

pub(super) fn holds(ledger: &MemoryLedger, person_id: &PersonId, award: AwardId) -> bool {
    ledger.has_grant(person_id, award).expect("ledger up")
}
