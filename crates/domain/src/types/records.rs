//! Import rows, validated records and per-row outcomes

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{API_DATETIME_FORMAT, INPUT_DATETIME_FORMATS};
use crate::errors::{Result, RoombookError};
use crate::impl_domain_status_conversions;

/// One row of the import file, as read (all fields still text).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based data row number (header excluded)
    pub row_number: usize,
    pub room_name: String,
    pub start: String,
    pub end: String,
    pub event_type_code: String,
    pub participant_email: Option<String>,
    pub narrative: String,
    pub event_name: Option<String>,
}

impl ImportRow {
    /// Check required fields and parse the time window.
    ///
    /// # Errors
    /// Returns `RoombookError::InvalidInput` naming the first problem found.
    pub fn validate(&self) -> Result<InputRecord> {
        let room_name = required("room_name", &self.room_name)?;
        let event_type_code = required("event_type", &self.event_type_code)?;
        let window = TimeWindow::parse(&self.start, &self.end)?;

        let participant_email = self
            .participant_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string);

        let narrative = self.narrative.trim().to_string();
        let event_name = self
            .event_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                if narrative.is_empty() {
                    event_type_code.clone()
                } else {
                    narrative.clone()
                }
            });

        Ok(InputRecord { room_name, window, event_type_code, participant_email, narrative, event_name })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RoombookError::InvalidInput(format!("Missing value for {field}.")));
    }
    Ok(trimmed.to_string())
}

/// Validated input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub room_name: String,
    pub window: TimeWindow,
    pub event_type_code: String,
    pub participant_email: Option<String>,
    pub narrative: String,
    pub event_name: String,
}

/// Event time window; `start` is always strictly before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// # Errors
    /// Returns `RoombookError::InvalidInput` unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(RoombookError::InvalidInput(format!(
                "Start {} is not before end {}.",
                start.format(API_DATETIME_FORMAT),
                end.format(API_DATETIME_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// # Errors
    /// Returns `RoombookError::InvalidInput` if either value does not parse or
    /// the window is empty or inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_datetime("start", start)?, parse_datetime("end", end)?)
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Start formatted for the API (`YYYY-MM-DD HH:MM:SS`)
    pub fn start_str(&self) -> String {
        self.start.format(API_DATETIME_FORMAT).to_string()
    }

    /// End formatted for the API (`YYYY-MM-DD HH:MM:SS`)
    pub fn end_str(&self) -> String {
        self.end.format(API_DATETIME_FORMAT).to_string()
    }
}

/// Parse a local datetime in any of the accepted input formats.
///
/// # Errors
/// Returns `RoombookError::InvalidInput` when no format matches.
pub fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RoombookError::InvalidInput(format!("Missing value for {field}.")));
    }

    INPUT_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            RoombookError::InvalidInput(format!("Unrecognised {field} datetime '{trimmed}'."))
        })
}

/// Stages a record passes through in the import pipeline.
///
/// The terminal state is carried by [`RowStatus`]; an `Outcome` keeps the
/// last stage reached before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStage {
    Pending,
    Validated,
    RoomResolved,
    ParticipantResolved,
    ParticipantSkipped,
    EventCreated,
    ParticipantAdded,
    ParticipantStepSkipped,
    UnavailabilityCreated,
}

impl_domain_status_conversions!(RecordStage {
    Pending => "pending",
    Validated => "validated",
    RoomResolved => "room_resolved",
    ParticipantResolved => "participant_resolved",
    ParticipantSkipped => "participant_skipped",
    EventCreated => "event_created",
    ParticipantAdded => "participant_added",
    ParticipantStepSkipped => "participant_step_skipped",
    UnavailabilityCreated => "unavailability_created",
});

/// Literal status written to the report for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Success,
    DryRun,
    Failed(String),
}

impl RowStatus {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::DryRun)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Success"),
            Self::DryRun => f.write_str("Success (dry run)"),
            Self::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Result of processing one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub row: ImportRow,
    pub status: RowStatus,
    /// Last stage reached before the terminal one
    pub stage: RecordStage,
    /// Href of an event created for this row, if it still exists remotely
    pub event_href: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ImportRow {
        ImportRow {
            row_number: 1,
            room_name: " Main Hall ".into(),
            start: "2024-12-21 16:00:00".into(),
            end: "2024-12-21 17:00:00".into(),
            event_type_code: "GENERAL_EVENT".into(),
            participant_email: Some("  ".into()),
            narrative: "Parents evening".into(),
            event_name: None,
        }
    }

    #[test]
    fn validate_trims_and_defaults_event_name() {
        let record = row().validate().unwrap();
        assert_eq!(record.room_name, "Main Hall");
        assert_eq!(record.participant_email, None);
        assert_eq!(record.event_name, "Parents evening");
        assert_eq!(record.window.start_str(), "2024-12-21 16:00:00");
    }

    #[test]
    fn event_name_falls_back_to_event_type_code() {
        let mut input = row();
        input.narrative = String::new();
        assert_eq!(input.validate().unwrap().event_name, "GENERAL_EVENT");
    }

    #[test]
    fn rejects_inverted_window() {
        let mut input = row();
        input.end = "2024-12-21 15:00:00".into();
        let err = input.validate().unwrap_err();
        assert!(matches!(err, RoombookError::InvalidInput(_)));
        assert!(err.to_string().contains("not before"));
    }

    #[test]
    fn rejects_empty_window() {
        let mut input = row();
        input.end = input.start.clone();
        assert!(input.validate().is_err());
    }

    #[test]
    fn accepts_uk_and_iso_formats() {
        let window = TimeWindow::parse("21/12/2024 16:00", "2024-12-21T17:30:00").unwrap();
        assert_eq!(window.start_str(), "2024-12-21 16:00:00");
        assert_eq!(window.end_str(), "2024-12-21 17:30:00");
    }

    #[test]
    fn missing_room_is_reported() {
        let mut input = row();
        input.room_name = String::new();
        assert_eq!(input.validate().unwrap_err().to_string(), "Missing value for room_name.");
    }

    #[test]
    fn status_renders_literal_report_values() {
        assert_eq!(RowStatus::Success.to_string(), "Success");
        assert_eq!(RowStatus::Failed("Room not found.".into()).to_string(), "Error: Room not found.");
        assert!(RowStatus::DryRun.is_success());
    }

    #[test]
    fn stage_names_round_trip() {
        use std::str::FromStr;
        assert_eq!(RecordStage::EventCreated.to_string(), "event_created");
        assert_eq!(RecordStage::from_str("ROOM_RESOLVED").unwrap(), RecordStage::RoomResolved);
    }

    #[test]
    fn terminal_states_are_not_stages() {
        use std::str::FromStr;
        assert!(RecordStage::from_str("success").is_err());
        assert!(RecordStage::from_str("failed").is_err());
    }
}
