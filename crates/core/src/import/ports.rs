//! Port interfaces for the remote SIS and the secret store

use async_trait::async_trait;
use roombook_domain::{EntityKind, RemoteId, Result, RoomRef, SchoolEventDraft, SisResult};

/// Remote SIS operations the import pipeline depends on.
///
/// Implementations map each call to exactly one request and never retry.
#[async_trait]
pub trait SisGateway: Send + Sync {
    /// Resolve a room by its display name.
    ///
    /// Zero matches is `SisError::NotFound(EntityKind::Room)`.
    async fn lookup_room(&self, room_name: &str) -> SisResult<RoomRef>;

    /// Owner id of the first email address entry owned by a staff member.
    ///
    /// `Ok(None)` when no staff-owned entry exists.
    async fn lookup_email_owner_id(
        &self,
        email_address: &str,
        address_type: &str,
    ) -> SisResult<Option<RemoteId>>;

    /// Create a school event and return its href.
    async fn create_school_event(&self, draft: &SchoolEventDraft) -> SisResult<String>;

    /// Attach a participant to an existing event.
    async fn add_event_participant(
        &self,
        event_href: &str,
        participant_id: &RemoteId,
        participant_kind: EntityKind,
    ) -> SisResult<()>;

    /// Delete a school event by id.
    async fn delete_school_event(&self, event_id: &str) -> SisResult<()>;

    /// Block a room for a time window.
    async fn create_room_unavailability(
        &self,
        room_id: &RemoteId,
        start: &str,
        end: &str,
        reason: &str,
    ) -> SisResult<serde_json::Value>;
}

/// Source of named secrets, read once at startup.
pub trait SecretProvider: Send + Sync {
    /// Fetch the secret stored under `name`.
    fn secret(&self, name: &str) -> Result<String>;
}
