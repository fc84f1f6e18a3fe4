//! # Roombook Core
//!
//! Pure import logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the SIS APIs and secret retrieval
//! - The per-record import pipeline and the run-scoped lookup cache
//! - The batch importer that drives the pipeline over a whole file
//!
//! ## Architecture Principles
//! - Only depends on `roombook-domain`
//! - No HTTP, file or platform code
//! - All external dependencies via traits

pub mod import;

pub use import::cache::LookupCache;
pub use import::pipeline::{process_record, PipelineOptions};
pub use import::ports::{SecretProvider, SisGateway};
pub use import::service::{BatchImporter, ImportReport, ImportSummary};
