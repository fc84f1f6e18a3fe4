//! REST request bodies

use roombook_domain::{EntityKind, EntityRef, SisError, SisResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Envelope key for an entity kind: the wire name in camelCase.
pub(crate) fn envelope_key(kind: EntityKind) -> String {
    let name = kind.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Wrap an entity body as `{"request": {"<entityKey>": body}}`.
pub(crate) fn envelope<T: Serialize>(kind: EntityKind, body: &T) -> SisResult<Value> {
    let body = serde_json::to_value(body)
        .map_err(|err| SisError::InvalidRequest(format!("cannot encode {kind} body: {err}")))?;

    let mut entity = Map::new();
    entity.insert(envelope_key(kind), body);

    let mut request = Map::new();
    request.insert("request".to_string(), Value::Object(entity));
    Ok(Value::Object(request))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchoolEventTypeBody<'a> {
    pub entity_type: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_event_type_name: Option<&'a str>,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchoolEventBody<'a> {
    pub entity_type: EntityKind,
    pub start_datetime: &'a str,
    pub end_datetime: &'a str,
    pub school_event_type: &'a EntityRef,
    pub location: &'a EntityRef,
    pub school_event_name: &'a str,
    pub narrative: &'a str,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoomUnavailabilityBody<'a> {
    pub entity_type: EntityKind,
    pub room: EntityRef,
    pub start_datetime: &'a str,
    pub end_datetime: &'a str,
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventParticipantBody {
    pub entity_type: EntityKind,
    pub event: EntityRef,
    pub participant: EntityRef,
}
