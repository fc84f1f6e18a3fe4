//! Remote SIS entity kinds and the references used to address them
//!
//! Every cross-entity link in a REST payload is encoded as
//! `{"entityType": "<Kind>", "id": <id>?, "href": "/rest-v2/<resource>/<id>"}`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::REST_PREFIX;

/// Tag identifying which remote domain type a reference or payload represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Room,
    Staff,
    Student,
    SchoolEvent,
    SchoolEventType,
    EventParticipant,
    RoomUnavailability,
    EmailAddress,
}

impl EntityKind {
    /// Wire name, as sent in `entityType`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Room => "Room",
            Self::Staff => "Staff",
            Self::Student => "Student",
            Self::SchoolEvent => "SchoolEvent",
            Self::SchoolEventType => "SchoolEventType",
            Self::EventParticipant => "EventParticipant",
            Self::RoomUnavailability => "RoomUnavailability",
            Self::EmailAddress => "EmailAddress",
        }
    }

    /// REST collection segment under `/rest-v2/`
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Room => "rooms",
            Self::Staff => "staff",
            Self::Student => "students",
            Self::SchoolEvent => "school-events",
            Self::SchoolEventType => "school-event-types",
            Self::EventParticipant => "eventParticipants",
            Self::RoomUnavailability => "roomUnavailability",
            Self::EmailAddress => "email-addresses",
        }
    }

    /// Resource path for one entity, e.g. `/rest-v2/rooms/96`
    pub fn href_for(self, key: &str) -> String {
        format!("{REST_PREFIX}/{}/{key}", self.resource())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a remote entity.
///
/// The GraphQL endpoint returns ids as strings while REST payloads carry
/// numbers; both decode into this type and it serializes back as a number
/// when the value is a canonical integer (`"007"` stays a string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RemoteId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for RemoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(number) if number.to_string() == self.0 => serializer.serialize_i64(number),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(number) => Self(number.to_string()),
            Raw::Text(text) => Self(text),
        })
    }
}

/// Typed reference to another remote entity inside a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    #[serde(rename = "entityType")]
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RemoteId>,
    pub href: String,
}

impl EntityRef {
    /// Reference carrying both the id and its derived href
    pub fn by_id(kind: EntityKind, id: RemoteId) -> Self {
        let href = kind.href_for(id.as_str());
        Self { kind, id: Some(id), href }
    }

    /// Reference by resource path only
    pub fn by_href(kind: EntityKind, href: impl Into<String>) -> Self {
        Self { kind, id: None, href: href.into() }
    }

    /// Reference to an entity addressed by a code (event types)
    pub fn by_code(kind: EntityKind, code: &str) -> Self {
        Self::by_href(kind, kind.href_for(code))
    }
}

/// Last path segment of an href, which is the entity's id or code.
pub fn href_key(href: &str) -> Option<&str> {
    href.trim_end_matches('/').rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// A room resolved from its display name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub id: RemoteId,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default, rename = "site", deserialize_with = "site_name")]
    pub site_name: Option<String>,
}

impl RoomRef {
    pub fn reference(&self) -> EntityRef {
        EntityRef::by_id(EntityKind::Room, self.id.clone())
    }
}

fn site_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Site {
        site_name: Option<String>,
    }

    Ok(Option::<Site>::deserialize(deserializer)?.and_then(|site| site.site_name))
}

/// Fields for a new school event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolEventDraft {
    pub name: String,
    pub start: String,
    pub end: String,
    pub event_type: EntityRef,
    pub location: EntityRef,
    pub narrative: String,
}

/// Status and body of a response the caller has to interpret itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
