//! Report writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{StringRecord, WriterBuilder};
use roombook_domain::constants::STATUS_COLUMN;
use roombook_domain::{Outcome, Result, RoombookError};
use tracing::debug;

use super::columns::normalize_header;
use super::reader::ImportTable;

/// Write the report to `path`, replacing any existing file.
///
/// # Errors
/// `RoombookError::Output` on any I/O failure, or when the number of
/// outcomes does not match the number of input rows.
pub fn write_report_file(
    path: impl AsRef<Path>,
    table: &ImportTable,
    outcomes: &[Outcome],
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| {
        RoombookError::Output(format!("cannot create {}: {err}", path.display()))
    })?;
    write_report(file, table, outcomes)?;
    debug!(path = %path.display(), rows = outcomes.len(), "report written");
    Ok(())
}

/// Write the input columns plus the status of each row.
///
/// An existing `status` column is overwritten in place; otherwise one is
/// appended after the widest row. Fields beyond the header are kept under
/// blank header names.
pub fn write_report<W: Write>(writer: W, table: &ImportTable, outcomes: &[Outcome]) -> Result<()> {
    if outcomes.len() != table.len() {
        return Err(RoombookError::Output(format!(
            "{} outcomes for {} input rows",
            outcomes.len(),
            table.len()
        )));
    }

    let status_index =
        table.headers().iter().position(|header| normalize_header(header) == STATUS_COLUMN);
    let width = table
        .records()
        .iter()
        .map(StringRecord::len)
        .max()
        .unwrap_or_default()
        .max(table.headers().len());

    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut headers = table.headers().clone();
    while headers.len() < width {
        headers.push_field("");
    }
    if status_index.is_none() {
        headers.push_field(STATUS_COLUMN);
    }
    writer.write_record(&headers).map_err(output_error)?;

    for (record, outcome) in table.records().iter().zip(outcomes) {
        let status = outcome.status.to_string();
        let mut row = StringRecord::with_capacity(record.as_slice().len(), width + 1);
        for index in 0..width {
            if Some(index) == status_index {
                row.push_field(&status);
            } else {
                row.push_field(record.get(index).unwrap_or_default());
            }
        }
        if status_index.is_none() {
            row.push_field(&status);
        }
        writer.write_record(&row).map_err(output_error)?;
    }

    writer.flush().map_err(|err| RoombookError::Output(err.to_string()))
}

fn output_error(err: csv::Error) -> RoombookError {
    RoombookError::Output(err.to_string())
}

#[cfg(test)]
mod tests {
    use roombook_domain::{ImportRow, RecordStage, RowStatus};

    use super::*;

    fn outcome(row: &ImportRow, status: RowStatus) -> Outcome {
        Outcome { row: row.clone(), status, stage: RecordStage::Validated, event_href: None }
    }

    fn render(input: &str, statuses: Vec<RowStatus>) -> String {
        let table = ImportTable::from_reader(input.as_bytes()).unwrap();
        let outcomes: Vec<_> = table
            .rows()
            .iter()
            .zip(statuses)
            .map(|(row, status)| outcome(row, status))
            .collect();

        let mut buffer = Vec::new();
        write_report(&mut buffer, &table, &outcomes).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn appends_status_after_extra_columns() {
        let output = render(
            "room,start,end,event_type,booked_by\nHall,a,b,GEN,Office\nLab,c,d,GEN,\n",
            vec![RowStatus::Success, RowStatus::Failed("Room not found.".into())],
        );

        assert_eq!(
            output,
            "room,start,end,event_type,booked_by,status\n\
             Hall,a,b,GEN,Office,Success\n\
             Lab,c,d,GEN,,Error: Room not found.\n"
        );
    }

    #[test]
    fn replaces_existing_status_column() {
        let output = render(
            "room,start,end,event_type,Status,note\nHall,a,b,GEN,Error: old,keep me\n",
            vec![RowStatus::DryRun],
        );

        assert_eq!(
            output,
            "room,start,end,event_type,Status,note\nHall,a,b,GEN,Success (dry run),keep me\n"
        );
    }

    #[test]
    fn keeps_fields_beyond_the_header() {
        let output = render(
            "room,start,end,event_type\nHall,a,b,GEN,extra-note\nLab,c,d,GEN\n",
            vec![RowStatus::Success, RowStatus::Success],
        );

        assert_eq!(
            output,
            "room,start,end,event_type,,status\n\
             Hall,a,b,GEN,extra-note,Success\n\
             Lab,c,d,GEN,,Success\n"
        );
    }

    #[test]
    fn refuses_mismatched_outcome_count() {
        let table = ImportTable::from_reader("room,start,end,event_type\nHall,a,b,GEN\n".as_bytes())
            .unwrap();
        let err = write_report(Vec::new(), &table, &[]).unwrap_err();
        assert!(matches!(err, RoombookError::Output(_)));
    }
}
