//! Import file reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use roombook_domain::{ImportRow, Result, RoombookError};
use tracing::debug;

use super::columns::{Column, ColumnMap};
use crate::errors::InfraError;

/// Parsed import file.
///
/// Keeps the raw records next to the mapped rows so the report can repeat
/// every input column, including ones the importer does not use.
#[derive(Debug, Clone)]
pub struct ImportTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
    rows: Vec<ImportRow>,
}

impl ImportTable {
    /// Read a CSV file from disk.
    ///
    /// # Errors
    /// `RoombookError::Input` if the file cannot be opened or parsed, or a
    /// required column is missing.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            RoombookError::Input(format!("cannot open {}: {err}", path.display()))
        })?;
        let table = Self::from_reader(file)?;
        debug!(path = %path.display(), rows = table.len(), "import file read");
        Ok(table)
    }

    /// Read CSV from any reader. The first record is the header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).trim(Trim::Headers).from_reader(reader);

        let headers = reader.headers().map_err(InfraError::from)?.clone();
        let columns = ColumnMap::resolve(headers.iter())?;

        let mut records = Vec::new();
        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(InfraError::from)?;
            rows.push(map_row(index + 1, &record, &columns));
            records.push(record);
        }

        Ok(Self { headers, records, rows })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn rows(&self) -> &[ImportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn map_row(row_number: usize, record: &StringRecord, columns: &ColumnMap) -> ImportRow {
    let field = |column: Column| -> Option<String> {
        columns.position(column).and_then(|index| record.get(index)).map(str::to_string)
    };

    ImportRow {
        row_number,
        room_name: field(Column::RoomName).unwrap_or_default(),
        start: field(Column::Start).unwrap_or_default(),
        end: field(Column::End).unwrap_or_default(),
        event_type_code: field(Column::EventType).unwrap_or_default(),
        participant_email: field(Column::ParticipantEmail),
        narrative: field(Column::Narrative).unwrap_or_default(),
        event_name: field(Column::EventName),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
room_name,start_datetime,end_datetime,event_type,participant_email,narrative,booked_by
Main Hall,2024-12-21 16:00:00,2024-12-21 17:00:00,GENERAL_EVENT,b.dobbs@school.org,Year 9 parents,Office
Lab 2,2024-12-22 09:00,2024-12-22 10:00,GENERAL_EVENT,,Science club,Office
";

    #[test]
    fn maps_rows_and_keeps_raw_records() {
        let table = ImportTable::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers().len(), 7);

        let first = &table.rows()[0];
        assert_eq!(first.row_number, 1);
        assert_eq!(first.room_name, "Main Hall");
        assert_eq!(first.participant_email.as_deref(), Some("b.dobbs@school.org"));
        assert_eq!(first.event_name, None);

        let second = &table.rows()[1];
        assert_eq!(second.row_number, 2);
        assert_eq!(second.participant_email.as_deref(), Some(""));
        assert_eq!(table.records()[1].get(6), Some("Office"));
    }

    #[test]
    fn short_rows_read_as_empty_fields() {
        let input = "room,start,end,event_type_code,comment\nMain Hall,2024-12-21 16:00\n";
        let table = ImportTable::from_reader(input.as_bytes()).unwrap();

        let row = &table.rows()[0];
        assert_eq!(row.start, "2024-12-21 16:00");
        assert_eq!(row.end, "");
        assert!(row.validate().is_err());
    }

    #[test]
    fn missing_room_column_is_an_input_error() {
        let input = "start,end,event_type\n";
        let err = ImportTable::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, RoombookError::Input(_)));
    }
}
