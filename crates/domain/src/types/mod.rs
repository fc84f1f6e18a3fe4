//! Domain types and models

pub mod credentials;
pub mod entities;
pub mod records;

pub use credentials::Credentials;
pub use entities::{
    href_key, EntityKind, EntityRef, RawResponse, RemoteId, RoomRef, SchoolEventDraft,
};
pub use records::{
    parse_datetime, ImportRow, InputRecord, Outcome, RecordStage, RowStatus, TimeWindow,
};
