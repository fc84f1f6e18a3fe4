use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roombook_core::SisGateway;
use roombook_domain::{
    EntityKind, ImportRow, RemoteId, RoomRef, SchoolEventDraft, SisError, SisResult,
};

/// One call made against the fake gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LookupRoom(String),
    LookupEmail(String),
    CreateEvent(SchoolEventDraft),
    AddParticipant { href: String, participant_id: RemoteId, kind: EntityKind },
    DeleteEvent(String),
    CreateUnavailability { room_id: RemoteId, start: String, end: String, reason: String },
}

/// In-memory `SisGateway` with scripted lookups and failures.
#[derive(Default, Clone)]
pub struct RecordingGateway {
    rooms: HashMap<String, RemoteId>,
    staff: HashMap<String, RemoteId>,
    fail_create: Option<SisError>,
    fail_participant: Option<SisError>,
    fail_delete: Option<SisError>,
    calls: Arc<Mutex<Vec<Call>>>,
    next_event_id: Arc<Mutex<u32>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self { next_event_id: Arc::new(Mutex::new(500)), ..Self::default() }
    }

    pub fn with_room(mut self, name: &str, id: i64) -> Self {
        self.rooms.insert(name.to_string(), RemoteId::from(id));
        self
    }

    pub fn with_staff(mut self, email: &str, id: i64) -> Self {
        self.staff.insert(email.to_lowercase(), RemoteId::from(id));
        self
    }

    pub fn failing_create(mut self, err: SisError) -> Self {
        self.fail_create = Some(err);
        self
    }

    pub fn failing_participant(mut self, err: SisError) -> Self {
        self.fail_participant = Some(err);
        self
    }

    pub fn failing_delete(mut self, err: SisError) -> Self {
        self.fail_delete = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SisGateway for RecordingGateway {
    async fn lookup_room(&self, room_name: &str) -> SisResult<RoomRef> {
        self.record(Call::LookupRoom(room_name.to_string()));
        self.rooms
            .get(room_name)
            .map(|id| RoomRef {
                id: id.clone(),
                room_name: room_name.to_string(),
                short_name: None,
                site_name: None,
            })
            .ok_or(SisError::NotFound(EntityKind::Room))
    }

    async fn lookup_email_owner_id(
        &self,
        email_address: &str,
        _address_type: &str,
    ) -> SisResult<Option<RemoteId>> {
        self.record(Call::LookupEmail(email_address.to_string()));
        Ok(self.staff.get(&email_address.to_lowercase()).cloned())
    }

    async fn create_school_event(&self, draft: &SchoolEventDraft) -> SisResult<String> {
        self.record(Call::CreateEvent(draft.clone()));
        if let Some(err) = &self.fail_create {
            return Err(err.clone());
        }
        let mut next = self.next_event_id.lock().unwrap();
        *next += 1;
        Ok(format!("/rest-v2/school-events/{}", *next))
    }

    async fn add_event_participant(
        &self,
        event_href: &str,
        participant_id: &RemoteId,
        participant_kind: EntityKind,
    ) -> SisResult<()> {
        self.record(Call::AddParticipant {
            href: event_href.to_string(),
            participant_id: participant_id.clone(),
            kind: participant_kind,
        });
        match &self.fail_participant {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn delete_school_event(&self, event_id: &str) -> SisResult<()> {
        self.record(Call::DeleteEvent(event_id.to_string()));
        match &self.fail_delete {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn create_room_unavailability(
        &self,
        room_id: &RemoteId,
        start: &str,
        end: &str,
        reason: &str,
    ) -> SisResult<serde_json::Value> {
        self.record(Call::CreateUnavailability {
            room_id: room_id.clone(),
            start: start.to_string(),
            end: end.to_string(),
            reason: reason.to_string(),
        });
        Ok(serde_json::json!({"roomUnavailability": {"id": 1}}))
    }
}

/// Row with sensible defaults; override fields per test.
pub fn row(number: usize, room: &str, email: Option<&str>) -> ImportRow {
    ImportRow {
        row_number: number,
        room_name: room.to_string(),
        start: "2024-12-21 16:00:00".to_string(),
        end: "2024-12-21 17:00:00".to_string(),
        event_type_code: "GENERAL_EVENT".to_string(),
        participant_email: email.map(str::to_string),
        narrative: format!("Booking {number}"),
        event_name: None,
    }
}
