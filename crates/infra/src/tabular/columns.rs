//! Header resolution for import files

use roombook_domain::{Result, RoombookError};

/// Semantic columns of an import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    RoomName,
    Start,
    End,
    EventType,
    ParticipantEmail,
    Narrative,
    EventName,
}

impl Column {
    const ALL: [Self; 7] = [
        Self::RoomName,
        Self::Start,
        Self::End,
        Self::EventType,
        Self::ParticipantEmail,
        Self::Narrative,
        Self::EventName,
    ];

    /// Accepted header names, canonical first
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::RoomName => &["room_name", "room"],
            Self::Start => &["start_datetime", "start"],
            Self::End => &["end_datetime", "end"],
            Self::EventType => &["event_type", "event_type_code"],
            Self::ParticipantEmail => &["participant_email", "email"],
            Self::Narrative => &["narrative", "comment"],
            Self::EventName => &["event_name"],
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(self, Self::RoomName | Self::Start | Self::End | Self::EventType)
    }

    pub fn canonical(self) -> &'static str {
        self.aliases()[0]
    }
}

/// Position of each semantic column in the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; 7],
}

impl ColumnMap {
    /// Match headers case-insensitively against the aliases.
    ///
    /// The first header matching any alias wins.
    ///
    /// # Errors
    /// `RoombookError::Input` naming every required column that is missing.
    pub fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();

        let mut map = Self::default();
        for (slot, column) in Column::ALL.iter().enumerate() {
            map.positions[slot] =
                normalized.iter().position(|header| column.aliases().contains(&header.as_str()));
        }

        let missing: Vec<&str> = Column::ALL
            .iter()
            .filter(|column| column.is_required() && map.position(**column).is_none())
            .map(|column| column.canonical())
            .collect();
        if !missing.is_empty() {
            return Err(RoombookError::Input(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(map)
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        Column::ALL.iter().position(|c| *c == column).and_then(|slot| self.positions[slot])
    }
}

/// Lowercased header with surrounding whitespace and any BOM removed.
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}
