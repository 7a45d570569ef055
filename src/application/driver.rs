//! Sequential run over the input rows
//!
//! Items are processed strictly one at a time. A skipped item never stops
//! the run; cancellation is honoured between items and during the pause.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::errors::SkipReason;
use super::item_processor::ItemProcessor;
use super::pacing::Pacer;
use crate::domain::{InputRow, OutputRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Zero-based position in the input
    pub row_index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub total_rows: usize,
    /// Records in input order
    pub records: Vec<OutputRecord>,
    pub skipped: Vec<SkippedItem>,
    pub cancelled: bool,
}

impl RunSummary {
    /// Rows never reached because the run was cancelled.
    pub fn unprocessed(&self) -> usize {
        self.total_rows.saturating_sub(self.records.len() + self.skipped.len())
    }
}

pub struct Driver {
    processor: ItemProcessor,
    pacer: Arc<dyn Pacer>,
}

impl Driver {
    pub fn new(processor: ItemProcessor, pacer: Arc<dyn Pacer>) -> Self {
        Self { processor, pacer }
    }

    pub async fn run(&self, rows: &[InputRow], cancel: &CancellationToken) -> RunSummary {
        let mut summary = RunSummary {
            run_id: Uuid::new_v4(),
            total_rows: rows.len(),
            ..RunSummary::default()
        };
        info!("Run {} started with {} item(s)", summary.run_id, rows.len());

        for (index, row) in rows.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let target = row.non_empty(self.processor.navigation_column()).unwrap_or("<none>");
            info!("Processing item {}/{}: {}", index + 1, rows.len(), target);

            match self.processor.process_item(row).await {
                Ok(record) => summary.records.push(record),
                Err(reason) => {
                    if reason.is_fetch_failure() {
                        error!("Item {} skipped: {}", index + 1, reason);
                    } else {
                        warn!("Item {} skipped: {}", index + 1, reason);
                    }
                    summary.skipped.push(SkippedItem { row_index: index, reason });
                }
            }

            if index + 1 < rows.len() {
                tokio::select! {
                    () = self.pacer.pause() => {}
                    () = cancel.cancelled() => {
                        summary.cancelled = true;
                        break;
                    }
                }
            }
        }

        if summary.cancelled {
            warn!(
                "Run {} cancelled with {} item(s) unprocessed",
                summary.run_id,
                summary.unprocessed()
            );
        }
        info!(
            "Run {} finished: {} record(s), {} skipped",
            summary.run_id,
            summary.records.len(),
            summary.skipped.len()
        );
        summary
    }
}
