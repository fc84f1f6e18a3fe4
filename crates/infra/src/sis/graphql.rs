//! GraphQL documents and response shapes
//!
//! Caller-supplied values only ever travel in `variables`; the documents
//! below are constants.

use roombook_domain::{RemoteId, RoomRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const ROOM_BY_NAME: &str = r#"
query RoomByName($roomName: String) {
    Room(roomName: $roomName) {
        id
        roomName
        shortName
        site {
            siteName
        }
    }
}
"#;

pub(crate) const EMAIL_ADDRESS_OWNER: &str = r#"
query EmailAddressOwner($emailAddress: String, $emailAddressType: String) {
    EmailAddress(emailAddress: $emailAddress, emailAddressType: $emailAddressType) {
        id
        emailAddress
        emailAddressType
        emailAddressOwner {
            id
            entityType
        }
    }
}
"#;

pub(crate) const SCHOOL_EVENTS_BY_TYPE: &str = r#"
query SchoolEventsByType($code: String) {
    SchoolEvent(schoolEventType__code: $code) {
        id
    }
}
"#;

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

impl<T> GraphQlResponse<T> {
    /// All error messages joined, if the server reported any
    pub fn error_summary(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|errors| !errors.is_empty())?;
        Some(errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join(", "))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomData {
    #[serde(rename = "Room")]
    pub rooms: Option<Vec<RoomRef>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailAddressData {
    #[serde(rename = "EmailAddress")]
    pub entries: Option<Vec<EmailAddressEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmailAddressEntry {
    pub email_address_owner: Option<EmailAddressOwner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmailAddressOwner {
    pub id: RemoteId,
    pub entity_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchoolEventIdData {
    #[serde(rename = "SchoolEvent")]
    pub events: Option<Vec<IdOnly>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdOnly {
    pub id: RemoteId,
}
