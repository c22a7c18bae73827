use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Utc, Weekday};
use metrics_exporter_prometheus::PrometheusHandle;

use club_awards::awards::{
    Activity, AttendanceStatus, AttendanceView, AwardId, EventId, EventKind, EventSummary,
    GrantId, GrantLedger, GrantMetadata, HistoryError, HistoryReader, LedgerError, PersonAward,
    PersonId, RsvpFilter, RsvpResponse, RsvpView, TeamAssignmentView,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct HistoryStore {
    rsvps: HashMap<PersonId, Vec<RsvpView>>,
    event_rsvps: HashMap<EventId, Vec<RsvpView>>,
    events: Vec<EventSummary>,
    attendance: HashMap<PersonId, Vec<AttendanceView>>,
    attendance_weekdays: HashMap<EventId, Weekday>,
    assignments: Vec<TeamAssignmentView>,
    captains: HashSet<PersonId>,
}

/// In-memory stand-in for the production event stores. Real deployments
/// implement [`HistoryReader`] against the club database; this backend
/// keeps the service and the demo self-contained.
#[derive(Default, Clone)]
pub(crate) struct InMemoryHistoryStore {
    store: Arc<Mutex<HistoryStore>>,
}

impl InMemoryHistoryStore {
    pub(crate) fn record_rsvp(&self, person: &PersonId, view: RsvpView) {
        let mut guard = self.store.lock().expect("history mutex poisoned");
        guard
            .event_rsvps
            .entry(view.event_id.clone())
            .or_default()
            .push(view.clone());
        guard.rsvps.entry(person.clone()).or_default().push(view);
    }

    pub(crate) fn record_event(&self, event: EventSummary) {
        let mut guard = self.store.lock().expect("history mutex poisoned");
        guard.events.push(event);
    }

    pub(crate) fn record_attendance(
        &self,
        person: &PersonId,
        event_id: EventId,
        start: DateTime<Utc>,
        status: AttendanceStatus,
    ) {
        let mut guard = self.store.lock().expect("history mutex poisoned");
        guard
            .attendance_weekdays
            .insert(event_id.clone(), start.weekday());
        guard
            .attendance
            .entry(person.clone())
            .or_default()
            .push(AttendanceView {
                event_id,
                status,
                checked_in_at: Some(start),
            });
    }

    pub(crate) fn record_assignment(&self, view: TeamAssignmentView) {
        let mut guard = self.store.lock().expect("history mutex poisoned");
        guard.assignments.push(view);
    }

    pub(crate) fn record_captain(&self, person: &PersonId) {
        let mut guard = self.store.lock().expect("history mutex poisoned");
        guard.captains.insert(person.clone());
    }
}

impl HistoryReader for InMemoryHistoryStore {
    fn eligible_rsvps(
        &self,
        person: &PersonId,
        filter: &RsvpFilter,
    ) -> Result<Vec<RsvpView>, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        let mut rows = guard.rsvps.get(person).cloned().unwrap_or_default();
        if let Some(kinds) = &filter.kinds {
            rows.retain(|row| row.event_kind.map(|kind| kinds.contains(&kind)).unwrap_or(false));
        }
        if filter.only_past {
            let now = Utc::now();
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

    fn event_yes_rsvps(&self, event: &EventId) -> Result<Vec<RsvpView>, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        let mut rows: Vec<RsvpView> = guard
            .event_rsvps
            .get(event)
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
        let guard = self.store.lock().expect("history mutex poisoned");
        let now = Utc::now();
        Ok(guard
            .events
            .iter()
            .filter(|event| event.kind.map(|kind| kinds.contains(&kind)).unwrap_or(false))
            .filter(|event| !only_past || event.start <= now)
            .cloned()
            .collect())
    }

    fn attendance_on_weekday(
        &self,
        person: &PersonId,
        weekday: Weekday,
    ) -> Result<Vec<AttendanceView>, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        Ok(guard
            .attendance
            .get(person)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| {
                        guard.attendance_weekdays.get(&record.event_id) == Some(&weekday)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn team_assignments(
        &self,
        person: &PersonId,
        activity: Activity,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        let mut rows: Vec<TeamAssignmentView> = guard
            .assignments
            .iter()
            .filter(|row| &row.person_id == person && row.activity == activity)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(rows)
    }

    fn team_assignments_for_event(
        &self,
        event: &EventId,
    ) -> Result<Vec<TeamAssignmentView>, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        Ok(guard
            .assignments
            .iter()
            .filter(|row| &row.event_id == event)
            .cloned()
            .collect())
    }

    fn has_captain_role(&self, person: &PersonId) -> Result<bool, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        Ok(guard.captains.contains(person))
    }

    fn recently_active(&self, since: DateTime<Utc>) -> Result<Vec<PersonId>, HistoryError> {
        let guard = self.store.lock().expect("history mutex poisoned");
        let mut members: Vec<PersonId> = guard
            .rsvps
            .iter()
            .filter(|(_, rows)| rows.iter().any(|row| row.responded_at >= since))
            .map(|(person, _)| person.clone())
            .collect();
        members.sort();
        Ok(members)
    }
}

/// In-memory grant ledger. The single mutex makes the existence check and
/// the insert one atomic step, which is the whole contract.
#[derive(Default, Clone)]
pub(crate) struct InMemoryGrantLedger {
    grants: Arc<Mutex<HashMap<(PersonId, AwardId), PersonAward>>>,
    sequence: Arc<AtomicU64>,
}

impl GrantLedger for InMemoryGrantLedger {
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
