//! Batch importer - drives the pipeline over every row of a file

use std::sync::Arc;
use std::time::Instant;

use roombook_domain::{ImportRow, Outcome};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::cache::LookupCache;
use super::pipeline::{process_record, PipelineOptions};
use super::ports::SisGateway;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Rows that failed after their event had been created and kept
    pub orphaned_events: usize,
    pub cache_hits: usize,
}

/// Outcomes of one run, one per input row and in input order.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub outcomes: Vec<Outcome>,
    pub summary: ImportSummary,
}

/// Sequential batch importer.
///
/// Rows are processed one at a time; a row's failure never stops the run.
pub struct BatchImporter {
    gateway: Arc<dyn SisGateway>,
    options: PipelineOptions,
    cache_lookups: bool,
}

impl BatchImporter {
    /// Create a new importer with lookup caching enabled
    pub fn new(gateway: Arc<dyn SisGateway>, options: PipelineOptions) -> Self {
        Self { gateway, options, cache_lookups: true }
    }

    /// Enable or disable the run-scoped lookup cache
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_lookups = enabled;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Process every row and collect the outcomes.
    pub async fn run(&self, rows: &[ImportRow]) -> ImportReport {
        let run_id = Uuid::now_v7();
        let span = info_span!("import_run", %run_id, mode = %self.options.mode);

        async move {
            let started = Instant::now();
            let mut cache = LookupCache::with_enabled(self.cache_lookups);
            let mut outcomes = Vec::with_capacity(rows.len());
            let mut summary = ImportSummary { total: rows.len(), ..ImportSummary::default() };

            info!(rows = rows.len(), dry_run = self.options.dry_run, "import started");

            for row in rows {
                let outcome =
                    process_record(self.gateway.as_ref(), &mut cache, row, &self.options).await;

                if outcome.status.is_success() {
                    summary.succeeded += 1;
                    info!(row = row.row_number, room = %row.room_name, stage = %outcome.stage, "row imported");
                } else {
                    summary.failed += 1;
                    if outcome.event_href.is_some() {
                        summary.orphaned_events += 1;
                    }
                    warn!(
                        row = row.row_number,
                        room = %row.room_name,
                        stage = %outcome.stage,
                        status = %outcome.status,
                        "row failed"
                    );
                }
                outcomes.push(outcome);
            }

            summary.cache_hits = cache.hits();
            info!(
                total = summary.total,
                succeeded = summary.succeeded,
                failed = summary.failed,
                orphaned_events = summary.orphaned_events,
                cache_hits = summary.cache_hits,
                duration_ms = started.elapsed().as_millis() as u64,
                "import finished"
            );

            ImportReport { run_id, outcomes, summary }
        }
        .instrument(span)
        .await
    }
}
