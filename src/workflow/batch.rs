/*!
 * Bulk-batch orchestration.
 *
 * This module contains functionality for fanning the single-item workflow
 * out over many source files with bounded concurrency, isolating per-item
 * failures so one bad file never aborts the run, and fanning results back
 * in as a summary ordered by discovery.
 */

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::errors::FailureReason;
use crate::file_utils::FileManager;
use crate::workflow::cancel::CancelSignal;
use crate::workflow::single::{ItemOutcome, SingleItemWorkflow};

/// Ordered record of every dispatched item's outcome
#[derive(Debug)]
pub struct BatchSummary {
    /// Correlation id for this run's log and report lines
    pub run_id: Uuid,
    outcomes: Vec<ItemOutcome>,
}

impl BatchSummary {
    fn new(run_id: Uuid, outcomes: Vec<ItemOutcome>) -> Self {
        Self { run_id, outcomes }
    }

    /// Outcomes in discovery order, one per dispatched item
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    /// Number of dispatched items
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Items that produced a translated destination
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Items that recorded a failure
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// How a batch run ended
#[derive(Debug)]
pub enum BatchRun {
    /// No matching source files were found; nothing was dispatched
    NothingToDo,
    /// Every dispatched item recorded exactly one outcome
    Completed(BatchSummary),
}

/// Fans the single-item workflow out over a directory of sources
pub struct BatchOrchestrator {
    /// The per-item workflow to dispatch
    workflow: SingleItemWorkflow,

    /// Maximum items processed at the same time
    concurrent_items: usize,

    /// File extensions considered translatable sources
    extensions: Vec<String>,

    /// Whether existing destinations are re-translated
    force_overwrite: bool,
}

impl BatchOrchestrator {
    /// Create a new batch orchestrator
    pub fn new(workflow: SingleItemWorkflow, concurrent_items: usize, extensions: Vec<String>) -> Self {
        Self {
            workflow,
            concurrent_items: concurrent_items.max(1),
            extensions,
            force_overwrite: false,
        }
    }

    /// Re-translate sources whose destination already exists
    pub fn with_force_overwrite(mut self, force_overwrite: bool) -> Self {
        self.force_overwrite = force_overwrite;
        self
    }

    /// Process every matching file under `source_dir`.
    ///
    /// Discovery is lexicographic so summaries are reproducible; the
    /// summary lists outcomes in that order regardless of completion
    /// order. The only item-independent error is failing to enumerate
    /// the source directory at all.
    pub async fn run(
        &self,
        source_dir: &Path,
        target_dir: &Path,
        cancel: &CancelSignal,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<BatchRun> {
        let run_id = Uuid::new_v4();

        let sources = FileManager::find_files(source_dir, &self.extensions)
            .with_context(|| format!("Failed to enumerate source directory {:?}", source_dir))?;

        // Fix the item list before dispatch so the summary covers exactly
        // the dispatched set: skip-existing happens here, not mid-flight.
        let items: Vec<(PathBuf, PathBuf)> = sources
            .into_iter()
            .filter_map(|source| {
                let destination = FileManager::derive_translated_path(&source, target_dir);
                if !self.force_overwrite && destination.exists() {
                    warn!(
                        "Skipping {:?}, translation already exists (use -f to force overwrite)",
                        source
                    );
                    return None;
                }
                Some((source, destination))
            })
            .collect();

        if items.is_empty() {
            info!("No matching source files under {:?}, nothing to do", source_dir);
            return Ok(BatchRun::NothingToDo);
        }

        FileManager::ensure_dir(target_dir)?;
        info!(
            "Run {}: dispatching {} item(s) with up to {} in flight",
            run_id,
            items.len(),
            self.concurrent_items
        );

        // Bound simultaneously in-flight items
        let semaphore = Arc::new(Semaphore::new(self.concurrent_items));

        let total_items = items.len();
        let completed_items = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(items.into_iter().enumerate())
            .map(|(index, (source, destination))| {
                let workflow = self.workflow.clone();
                let semaphore = semaphore.clone();
                let cancel = cancel.clone();
                let completed_items = completed_items.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    // A cancel observed before dispatch still records one
                    // outcome for the item; the summary never has holes.
                    if cancel.is_cancelled() {
                        return (
                            index,
                            ItemOutcome::Failure {
                                source,
                                reason: FailureReason::Cancelled,
                                elapsed: Duration::ZERO,
                            },
                        );
                    }

                    let _permit = semaphore.acquire().await.unwrap();
                    let outcome = workflow.run(&source, &destination, &cancel).await;

                    let current = completed_items.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_items);

                    match &outcome {
                        ItemOutcome::Success { .. } => info!("{}", outcome.summary_line()),
                        ItemOutcome::Failure { .. } => warn!("{}", outcome.summary_line()),
                    }

                    (index, outcome)
                }
            })
            .buffer_unordered(self.concurrent_items)
            .collect::<Vec<_>>()
            .await;

        // Restore discovery order regardless of completion order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<ItemOutcome> = sorted_results.into_iter().map(|(_, o)| o).collect();

        let summary = BatchSummary::new(run_id, outcomes);
        info!(
            "Run {}: {} item(s), {} succeeded, {} failed",
            summary.run_id,
            summary.total(),
            summary.succeeded(),
            summary.failed()
        );

        Ok(BatchRun::Completed(summary))
    }
}
