//! CSV import source and report sink
//!
//! The report repeats every input column verbatim, in input order, with the
//! row status in the `status` column.

pub mod columns;
pub mod reader;
pub mod writer;

pub use reader::ImportTable;
pub use writer::{write_report, write_report_file};
