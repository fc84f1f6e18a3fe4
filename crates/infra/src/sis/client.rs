/// SIS client for school events, event types, rooms and staff lookups
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use roombook_core::SisGateway;
use roombook_domain::constants::{GRAPHQL_PATH, REST_PREFIX};
use roombook_domain::{
    Credentials, EntityKind, EntityRef, RawResponse, RemoteId, RoombookError, RoomRef,
    SchoolEventDraft, SisError, SisResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::graphql::{
    EmailAddressData, GraphQlRequest, GraphQlResponse, RoomData, SchoolEventIdData,
    EMAIL_ADDRESS_OWNER, ROOM_BY_NAME, SCHOOL_EVENTS_BY_TYPE,
};
use super::payloads::{
    envelope, envelope_key, EventParticipantBody, RoomUnavailabilityBody, SchoolEventBody,
    SchoolEventTypeBody,
};
use super::responses::{
    decode_json, expect_created, expect_deleted, into_raw, read_body, Created,
};
use crate::http::HttpClient;

/// Result of deleting every school event of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub deleted: Vec<RemoteId>,
    pub failed: Vec<(RemoteId, SisError)>,
}

/// Client for the SIS REST and GraphQL endpoints.
///
/// Holds the credentials for its whole lifetime and attaches Basic Auth to
/// every request. Each method issues exactly one request, apart from
/// [`SisClient::purge_school_events_by_type`] which is a loop over
/// [`SisClient::delete_school_event`].
pub struct SisClient {
    credentials: Credentials,
    http: HttpClient,
    rest_base: Url,
    graphql_url: Url,
}

impl SisClient {
    /// Create a client with the given per-request timeout.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, RoombookError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Self::with_http_client(credentials, http)
    }

    /// Create a client on top of an existing [`HttpClient`].
    pub fn with_http_client(
        credentials: Credentials,
        http: HttpClient,
    ) -> Result<Self, RoombookError> {
        let base = Url::parse(credentials.base_url()).map_err(|err| {
            RoombookError::Config(format!("invalid SIS base URL '{}': {err}", credentials.base_url()))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RoombookError::Config(format!(
                "SIS base URL must use http or https, got '{}'",
                base.scheme()
            )));
        }

        let rest_base = join_path(&base, REST_PREFIX)?;
        let graphql_url = join_path(&base, GRAPHQL_PATH)?;

        Ok(Self { credentials, http, rest_base, graphql_url })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // =========================================================================
    // Event types
    // =========================================================================

    /// All event types, decoded whatever the status.
    pub async fn list_event_types(&self) -> SisResult<Value> {
        let url = self.rest_url(&[EntityKind::SchoolEventType.resource(), ""])?;
        decode_json(self.send(Method::GET, url, None::<&Value>).await?).await
    }

    /// One event type by code, decoded whatever the status.
    pub async fn get_event_type(&self, code: &str) -> SisResult<Value> {
        let url = self.rest_url(&[EntityKind::SchoolEventType.resource(), code])?;
        decode_json(self.send(Method::GET, url, None::<&Value>).await?).await
    }

    /// Create an active event type.
    pub async fn create_event_type(&self, code: &str, name: &str) -> SisResult<Value> {
        let body = SchoolEventTypeBody {
            entity_type: EntityKind::SchoolEventType,
            href: None,
            code: Some(code),
            school_event_type_name: Some(name),
            active: true,
        };
        let payload = envelope(EntityKind::SchoolEventType, &body)?;
        let url = self.rest_url(&[EntityKind::SchoolEventType.resource(), ""])?;

        let created = expect_created(self.send(Method::POST, url, Some(&payload)).await?).await?;
        info!(code, "event type created");
        Ok(created.body)
    }

    /// Rename or re-code an event type. The caller checks the status.
    pub async fn update_event_type(
        &self,
        code: &str,
        new_code: &str,
        new_name: &str,
        active: bool,
    ) -> SisResult<RawResponse> {
        let body = SchoolEventTypeBody {
            entity_type: EntityKind::SchoolEventType,
            href: Some(EntityKind::SchoolEventType.href_for(code)),
            code: Some(new_code),
            school_event_type_name: Some(new_name),
            active,
        };
        self.put_event_type(code, &body).await
    }

    pub async fn enable_event_type(&self, code: &str) -> SisResult<RawResponse> {
        self.set_event_type_active(code, true).await
    }

    pub async fn disable_event_type(&self, code: &str) -> SisResult<RawResponse> {
        self.set_event_type_active(code, false).await
    }

    /// Delete an event type; only 204 counts as success.
    pub async fn delete_event_type(&self, code: &str) -> SisResult<()> {
        let url = self.rest_url(&[EntityKind::SchoolEventType.resource(), code])?;
        expect_deleted(self.send(Method::DELETE, url, None::<&Value>).await?).await?;
        info!(code, "event type deleted");
        Ok(())
    }

    async fn set_event_type_active(&self, code: &str, active: bool) -> SisResult<RawResponse> {
        let body = SchoolEventTypeBody {
            entity_type: EntityKind::SchoolEventType,
            href: Some(EntityKind::SchoolEventType.href_for(code)),
            code: None,
            school_event_type_name: None,
            active,
        };
        self.put_event_type(code, &body).await
    }

    async fn put_event_type(
        &self,
        code: &str,
        body: &SchoolEventTypeBody<'_>,
    ) -> SisResult<RawResponse> {
        let payload = envelope(EntityKind::SchoolEventType, body)?;
        let url = self.rest_url(&[EntityKind::SchoolEventType.resource(), code])?;
        let raw = into_raw(self.send(Method::PUT, url, Some(&payload)).await?).await?;
        if !raw.is_success() {
            warn!(code, status = raw.status, "event type update not accepted");
        }
        Ok(raw)
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    /// Resolve a room by display name.
    ///
    /// Zero matches, GraphQL errors and unexpected shapes all mean
    /// `NotFound(Room)`; a non-200 status is a transport failure.
    pub async fn lookup_room(&self, room_name: &str) -> SisResult<RoomRef> {
        let response = match self
            .graphql::<RoomData>(ROOM_BY_NAME, json!({ "roomName": room_name }))
            .await
        {
            Ok(response) => response,
            Err(SisError::MalformedResponse(reason)) => {
                debug!(room_name, %reason, "room lookup response not understood");
                return Err(SisError::NotFound(EntityKind::Room));
            }
            Err(err) => return Err(err),
        };

        if let Some(errors) = response.error_summary() {
            debug!(room_name, %errors, "room lookup returned GraphQL errors");
        }

        response
            .data
            .and_then(|data| data.rooms)
            .and_then(|rooms| rooms.into_iter().next())
            .ok_or(SisError::NotFound(EntityKind::Room))
    }

    pub async fn lookup_room_id(&self, room_name: &str) -> SisResult<RemoteId> {
        self.lookup_room(room_name).await.map(|room| room.id)
    }

    /// Block a room for a time window.
    pub async fn create_room_unavailability(
        &self,
        room_id: &RemoteId,
        start: &str,
        end: &str,
        reason: &str,
    ) -> SisResult<Value> {
        let body = RoomUnavailabilityBody {
            entity_type: EntityKind::RoomUnavailability,
            room: EntityRef::by_id(EntityKind::Room, room_id.clone()),
            start_datetime: start,
            end_datetime: end,
            reason,
        };
        let payload = envelope(EntityKind::RoomUnavailability, &body)?;
        let url = self.rest_url(&[EntityKind::RoomUnavailability.resource()])?;

        let created = expect_created(self.send(Method::POST, url, Some(&payload)).await?).await?;
        debug!(%room_id, start, end, "room unavailability created");
        Ok(created.body)
    }

    // =========================================================================
    // Staff
    // =========================================================================

    /// Owner id of the first email entry owned by a staff member.
    pub async fn lookup_email_owner_id(
        &self,
        email_address: &str,
        address_type: &str,
    ) -> SisResult<Option<RemoteId>> {
        let variables = json!({
            "emailAddress": email_address,
            "emailAddressType": address_type,
        });
        let response = self.graphql::<EmailAddressData>(EMAIL_ADDRESS_OWNER, variables).await?;
        let errors = response.error_summary();

        let Some(data) = response.data else {
            return Err(SisError::MalformedResponse(
                errors.unwrap_or_else(|| "email lookup response has no data".into()),
            ));
        };

        let owner = data
            .entries
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.email_address_owner)
            .find(|owner| owner.entity_type.eq_ignore_ascii_case(EntityKind::Staff.as_str()))
            .map(|owner| owner.id);
        Ok(owner)
    }

    // =========================================================================
    // School events
    // =========================================================================

    /// All school events, decoded whatever the status.
    pub async fn list_school_events(&self) -> SisResult<Value> {
        let url = self.rest_url(&[EntityKind::SchoolEvent.resource(), ""])?;
        decode_json(self.send(Method::GET, url, None::<&Value>).await?).await
    }

    /// Ids of every school event of the given type.
    pub async fn find_school_event_ids_by_type(&self, code: &str) -> SisResult<Vec<RemoteId>> {
        let response =
            self.graphql::<SchoolEventIdData>(SCHOOL_EVENTS_BY_TYPE, json!({ "code": code })).await?;
        let errors = response.error_summary();

        let Some(data) = response.data else {
            return Err(SisError::MalformedResponse(
                errors.unwrap_or_else(|| "school event search response has no data".into()),
            ));
        };
        Ok(data.events.unwrap_or_default().into_iter().map(|event| event.id).collect())
    }

    /// Create a school event and return its href.
    pub async fn create_school_event(&self, draft: &SchoolEventDraft) -> SisResult<String> {
        let body = SchoolEventBody {
            entity_type: EntityKind::SchoolEvent,
            start_datetime: &draft.start,
            end_datetime: &draft.end,
            school_event_type: &draft.event_type,
            location: &draft.location,
            school_event_name: &draft.name,
            narrative: &draft.narrative,
            active: true,
        };
        let payload = envelope(EntityKind::SchoolEvent, &body)?;
        let url = self.rest_url(&[EntityKind::SchoolEvent.resource(), ""])?;

        let created = expect_created(self.send(Method::POST, url, Some(&payload)).await?).await?;
        created_href(&created, EntityKind::SchoolEvent).ok_or_else(|| {
            SisError::MalformedResponse("created school event has no href or id".into())
        })
    }

    /// Attach a participant to an event.
    pub async fn add_event_participant(
        &self,
        event_href: &str,
        participant_id: &RemoteId,
        participant_kind: EntityKind,
    ) -> SisResult<()> {
        let body = EventParticipantBody {
            entity_type: EntityKind::EventParticipant,
            event: EntityRef::by_href(EntityKind::SchoolEvent, event_href),
            participant: EntityRef::by_id(participant_kind, participant_id.clone()),
        };
        let payload = envelope(EntityKind::EventParticipant, &body)?;
        let url = self.rest_url(&[EntityKind::EventParticipant.resource()])?;

        expect_created(self.send(Method::POST, url, Some(&payload)).await?).await?;
        debug!(event_href, %participant_id, kind = %participant_kind, "participant added");
        Ok(())
    }

    /// Delete a school event; only 204 counts as success.
    pub async fn delete_school_event(&self, event_id: &str) -> SisResult<()> {
        let url = self.rest_url(&[EntityKind::SchoolEvent.resource(), event_id])?;
        expect_deleted(self.send(Method::DELETE, url, None::<&Value>).await?).await?;
        debug!(event_id, "school event deleted");
        Ok(())
    }

    /// Delete every school event of one type, continuing past failures.
    pub async fn purge_school_events_by_type(&self, code: &str) -> SisResult<PurgeReport> {
        let ids = self.find_school_event_ids_by_type(code).await?;
        info!(code, events = ids.len(), "purging school events");

        let mut report = PurgeReport::default();
        for id in ids {
            match self.delete_school_event(id.as_str()).await {
                Ok(()) => report.deleted.push(id),
                Err(err) => {
                    warn!(%id, error = %err, "failed to delete school event");
                    report.failed.push((id, err));
                }
            }
        }

        info!(
            code,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "purge finished"
        );
        Ok(report)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn rest_url(&self, segments: &[&str]) -> SisResult<Url> {
        let mut url = self.rest_base.clone();
        url.path_segments_mut()
            .map_err(|()| SisError::InvalidRequest("REST base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(self.credentials.username(), Some(self.credentials.password()))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> SisResult<reqwest::Response> {
        let mut request = self.authorized(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.http.send(request).await
    }

    /// POST a query with bound variables. Anything but 200 is a transport
    /// failure; an undecodable body is `MalformedResponse`.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> SisResult<GraphQlResponse<T>> {
        let request = GraphQlRequest { query, variables };
        let response =
            self.send(Method::POST, self.graphql_url.clone(), Some(&request)).await?;

        let status = response.status();
        let body = read_body(response).await?;
        if status != StatusCode::OK {
            return Err(SisError::Transport { status: status.as_u16(), body });
        }

        serde_json::from_str(&body)
            .map_err(|err| SisError::MalformedResponse(format!("GraphQL response: {err}")))
    }
}

#[async_trait]
impl SisGateway for SisClient {
    async fn lookup_room(&self, room_name: &str) -> SisResult<RoomRef> {
        SisClient::lookup_room(self, room_name).await
    }

    async fn lookup_email_owner_id(
        &self,
        email_address: &str,
        address_type: &str,
    ) -> SisResult<Option<RemoteId>> {
        SisClient::lookup_email_owner_id(self, email_address, address_type).await
    }

    async fn create_school_event(&self, draft: &SchoolEventDraft) -> SisResult<String> {
        SisClient::create_school_event(self, draft).await
    }

    async fn add_event_participant(
        &self,
        event_href: &str,
        participant_id: &RemoteId,
        participant_kind: EntityKind,
    ) -> SisResult<()> {
        SisClient::add_event_participant(self, event_href, participant_id, participant_kind).await
    }

    async fn delete_school_event(&self, event_id: &str) -> SisResult<()> {
        SisClient::delete_school_event(self, event_id).await
    }

    async fn create_room_unavailability(
        &self,
        room_id: &RemoteId,
        start: &str,
        end: &str,
        reason: &str,
    ) -> SisResult<Value> {
        SisClient::create_room_unavailability(self, room_id, start, end, reason).await
    }
}

/// Append a fixed path such as `/rest-v2` to the base URL.
fn join_path(base: &Url, path: &str) -> Result<Url, RoombookError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| RoombookError::Config(format!("SIS base URL '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

/// Href of a created entity.
///
/// Looks for `href` (or `id`) on the entity in the body, either at the top
/// level or under `response`, then falls back to the `Location` header.
fn created_href(created: &Created, kind: EntityKind) -> Option<String> {
    let key = envelope_key(kind);
    let entity = created
        .body
        .get(&key)
        .or_else(|| created.body.get("response").and_then(|response| response.get(&key)));

    entity
        .and_then(|entity| {
            entity
                .get("href")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| id_text(entity.get("id")?).map(|id| kind.href_for(&id)))
        })
        .or_else(|| created.location_path())
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}
