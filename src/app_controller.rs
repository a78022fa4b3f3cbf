use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils::LanguagePair;
use crate::service::http::HttpTranslationApi;
use crate::service::{Engine, LanguageDirection, TranslationApi};
use crate::workflow::batch::{BatchOrchestrator, BatchRun};
use crate::workflow::cancel::CancelSignal;
use crate::workflow::poller::PollPolicy;
use crate::workflow::single::{ItemOutcome, SingleItemWorkflow};

// @module: Application controller for document translation

/// Fixed sample paths used when single mode is invoked with blanks
const SAMPLE_SOURCE: &str = "sample_source.txt";
const SAMPLE_DESTINATION: &str = "sample_source_translated.txt";

/// Content written when the sample source has to be created
const SAMPLE_CONTENT: &str = "This is a sample document.\nReplace it with the file you want translated.\n";

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared service handle
    api: Arc<dyn TranslationApi>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let api = HttpTranslationApi::new(
            config.service.api_key.clone(),
            &config.service.endpoint,
            config.service.timeout_secs,
        )
        .map_err(|e| anyhow!("Failed to build service client: {}", e))?;
        Ok(Self {
            config,
            api: Arc::new(api),
        })
    }

    /// Create a controller over an already-built service handle.
    ///
    /// Used by tests to substitute the mock service.
    pub fn with_api(config: Config, api: Arc<dyn TranslationApi>) -> Self {
        Self { config, api }
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.target_language.is_empty()
    }

    fn language_pair(&self) -> Result<LanguagePair> {
        LanguagePair::parse(&self.config.source_language, &self.config.target_language)
            .context("Invalid language configuration")
    }

    fn single_workflow(&self) -> Result<SingleItemWorkflow> {
        Ok(SingleItemWorkflow::new(
            self.api.clone(),
            PollPolicy::from_config(&self.config.polling),
            self.language_pair()?,
        ))
    }

    /// Translate one document.
    ///
    /// Omitted paths fall back to the fixed sample paths; the sample
    /// source file is created if it does not exist yet.
    pub async fn run_single(
        &self,
        source: Option<PathBuf>,
        destination: Option<PathBuf>,
        cancel: &CancelSignal,
    ) -> Result<ItemOutcome> {
        let defaulted_source = source.is_none();
        let source = source.unwrap_or_else(|| PathBuf::from(SAMPLE_SOURCE));
        let destination = destination.unwrap_or_else(|| PathBuf::from(SAMPLE_DESTINATION));

        if defaulted_source && !FileManager::file_exists(&source) {
            info!("Creating sample source file at {:?}", source);
            FileManager::write_to_file(&source, SAMPLE_CONTENT)?;
        }

        let start_time = std::time::Instant::now();
        let workflow = self.single_workflow()?;
        let outcome = workflow.run(&source, &destination, cancel).await;

        match &outcome {
            ItemOutcome::Success { .. } => info!(
                "Translation completed in {}.",
                Self::format_duration(start_time.elapsed())
            ),
            ItemOutcome::Failure { reason, .. } => {
                warn!("Translation failed: {} [{}]", reason, reason.code());
            }
        }

        Ok(outcome)
    }

    /// Translate every matching file under a source directory.
    ///
    /// Per-item outcomes are logged as they land and appended to the run
    /// report file; a single failing item never stops the rest.
    pub async fn run_batch(
        &self,
        source_dir: PathBuf,
        target_dir: PathBuf,
        force_overwrite: bool,
        cancel: &CancelSignal,
    ) -> Result<BatchRun> {
        if !FileManager::dir_exists(&source_dir) {
            return Err(anyhow!("Source directory does not exist: {:?}", source_dir));
        }

        // Probe service reachability once per process, off the hot path
        static INIT_TEST: Once = Once::new();
        INIT_TEST.call_once(|| {
            let api = self.api.clone();
            tokio::spawn(async move {
                if let Err(e) = api.list_engines().await {
                    warn!("Service connection check failed: {}", e);
                }
            });
        });

        let start_time = std::time::Instant::now();
        let orchestrator = BatchOrchestrator::new(
            self.single_workflow()?,
            self.config.batch.concurrent_items,
            self.config.batch.file_extensions.clone(),
        )
        .with_force_overwrite(force_overwrite);

        let multi_progress = MultiProgress::new();
        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} documents")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let callback_bar = progress_bar.clone();
        let run = orchestrator
            .run(&source_dir, &target_dir, cancel, move |current, total| {
                callback_bar.set_length(total as u64);
                callback_bar.set_position(current as u64);
            })
            .await?;
        progress_bar.finish_and_clear();

        match &run {
            BatchRun::NothingToDo => {
                info!("Nothing to do: no matching files under {:?}", source_dir);
            }
            BatchRun::Completed(summary) => {
                self.append_run_report(summary.run_id, summary.outcomes())?;
                info!(
                    "Batch finished in {}: {} succeeded, {} failed out of {}",
                    Self::format_duration(start_time.elapsed()),
                    summary.succeeded(),
                    summary.failed(),
                    summary.total()
                );
            }
        }

        Ok(run)
    }

    /// List the translation engines the service offers
    pub async fn list_engines(&self) -> Result<Vec<Engine>> {
        Ok(self.api.list_engines().await?)
    }

    /// List the language directions the service supports
    pub async fn list_language_directions(&self) -> Result<Vec<LanguageDirection>> {
        Ok(self.api.list_language_directions().await?)
    }

    /// Append one line per outcome to the run report file
    fn append_run_report(&self, run_id: uuid::Uuid, outcomes: &[ItemOutcome]) -> Result<()> {
        let report = Path::new(&self.config.batch.report_file);
        for outcome in outcomes {
            FileManager::append_to_log_file(report, &format!("{} {}", run_id, outcome.summary_line()))?;
        }
        Ok(())
    }

    /// Render a duration as a short human-readable string
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
