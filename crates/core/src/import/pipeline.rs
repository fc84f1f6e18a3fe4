//! Per-record import pipeline
//!
//! `process_record` turns one input row into one `Outcome`. It never returns
//! an error: any failure aborts the remaining steps for that row and is
//! reported in the row status.

use roombook_domain::{
    href_key, EntityKind, EntityRef, ImportConfig, ImportMode, ImportRow, InputRecord,
    OrphanPolicy, Outcome, RecordStage, RemoteId, RoombookError, RoomRef, RowStatus,
    SchoolEventDraft,
};
use tracing::{debug, warn};

use super::cache::LookupCache;
use super::ports::SisGateway;

/// Knobs for a single pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub mode: ImportMode,
    pub orphan_policy: OrphanPolicy,
    pub email_address_type: String,
    /// Resolve lookups but create nothing
    pub dry_run: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}

impl PipelineOptions {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            mode: config.mode,
            orphan_policy: config.orphan_policy,
            email_address_type: config.email_address_type.clone(),
            dry_run: false,
        }
    }

    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Tracks how far a row got, so failures can report it.
struct Progress {
    stage: RecordStage,
    event_href: Option<String>,
}

impl Progress {
    fn advance(&mut self, stage: RecordStage) {
        self.stage = stage;
    }
}

/// Run the full pipeline for one row.
pub async fn process_record(
    gateway: &dyn SisGateway,
    cache: &mut LookupCache,
    row: &ImportRow,
    options: &PipelineOptions,
) -> Outcome {
    let mut progress = Progress { stage: RecordStage::Pending, event_href: None };

    let result = match row.validate() {
        Ok(record) => {
            progress.advance(RecordStage::Validated);
            match options.mode {
                ImportMode::Events => {
                    import_event(gateway, cache, &record, options, &mut progress).await
                }
                ImportMode::Unavailability => {
                    import_unavailability(gateway, cache, &record, options, &mut progress).await
                }
            }
        }
        Err(err) => Err(err),
    };

    let status = match result {
        Ok(()) if options.dry_run => RowStatus::DryRun,
        Ok(()) => RowStatus::Success,
        Err(err) => RowStatus::Failed(err.to_string()),
    };

    Outcome { row: row.clone(), status, stage: progress.stage, event_href: progress.event_href }
}

async fn import_event(
    gateway: &dyn SisGateway,
    cache: &mut LookupCache,
    record: &InputRecord,
    options: &PipelineOptions,
    progress: &mut Progress,
) -> Result<(), RoombookError> {
    let room = resolve_room(gateway, cache, &record.room_name).await?;
    progress.advance(RecordStage::RoomResolved);

    let staff_id = match record.participant_email.as_deref() {
        Some(email) => {
            resolve_owner(gateway, cache, email, &options.email_address_type).await?
        }
        None => None,
    };
    progress.advance(if staff_id.is_some() {
        RecordStage::ParticipantResolved
    } else {
        RecordStage::ParticipantSkipped
    });

    if options.dry_run {
        return Ok(());
    }

    let draft = SchoolEventDraft {
        name: record.event_name.clone(),
        start: record.window.start_str(),
        end: record.window.end_str(),
        event_type: EntityRef::by_code(EntityKind::SchoolEventType, &record.event_type_code),
        location: room.reference(),
        narrative: record.narrative.clone(),
    };
    let href = gateway.create_school_event(&draft).await?;
    debug!(href = %href, room_id = %room.id, "school event created");
    progress.event_href = Some(href.clone());
    progress.advance(RecordStage::EventCreated);

    let Some(staff_id) = staff_id else {
        progress.advance(RecordStage::ParticipantStepSkipped);
        return Ok(());
    };

    if let Err(err) = gateway.add_event_participant(&href, &staff_id, EntityKind::Staff).await {
        if options.orphan_policy == OrphanPolicy::Delete {
            compensate(gateway, &href, progress).await;
        } else {
            warn!(href = %href, error = %err, "participant association failed; event left without participant");
        }
        return Err(err.into());
    }
    progress.advance(RecordStage::ParticipantAdded);
    Ok(())
}

async fn import_unavailability(
    gateway: &dyn SisGateway,
    cache: &mut LookupCache,
    record: &InputRecord,
    options: &PipelineOptions,
    progress: &mut Progress,
) -> Result<(), RoombookError> {
    let room = resolve_room(gateway, cache, &record.room_name).await?;
    progress.advance(RecordStage::RoomResolved);

    if options.dry_run {
        return Ok(());
    }

    gateway
        .create_room_unavailability(
            &room.id,
            &record.window.start_str(),
            &record.window.end_str(),
            &record.narrative,
        )
        .await?;
    progress.advance(RecordStage::UnavailabilityCreated);
    Ok(())
}

async fn resolve_room(
    gateway: &dyn SisGateway,
    cache: &mut LookupCache,
    room_name: &str,
) -> Result<RoomRef, RoombookError> {
    if let Some(room) = cache.room(room_name) {
        return Ok(room);
    }
    let room = gateway.lookup_room(room_name).await?;
    cache.remember_room(room_name, room.clone());
    Ok(room)
}

async fn resolve_owner(
    gateway: &dyn SisGateway,
    cache: &mut LookupCache,
    email: &str,
    address_type: &str,
) -> Result<Option<RemoteId>, RoombookError> {
    if let Some(owner) = cache.owner(email, address_type) {
        return Ok(owner);
    }
    let owner = gateway.lookup_email_owner_id(email, address_type).await?;
    if owner.is_none() {
        debug!(email, "no staff owner for email; participant step will be skipped");
    }
    cache.remember_owner(email, address_type, owner.clone());
    Ok(owner)
}

/// Delete an event whose participant could not be attached.
async fn compensate(gateway: &dyn SisGateway, href: &str, progress: &mut Progress) {
    let Some(event_id) = href_key(href) else {
        warn!(href, "cannot derive event id from href; orphaned event kept");
        return;
    };

    match gateway.delete_school_event(event_id).await {
        Ok(()) => {
            debug!(href, "orphaned event deleted");
            progress.event_href = None;
        }
        Err(err) => warn!(href, error = %err, "failed to delete orphaned event"),
    }
}
