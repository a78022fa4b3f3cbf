/*!
 * One-document workflow: submit, poll, retrieve.
 *
 * Every run produces exactly one [`ItemOutcome`]; no error crosses this
 * boundary as anything but a typed failure, which is what lets the batch
 * orchestrator treat failures as data instead of control flow.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::{debug, info};

use crate::errors::{FailureReason, RetrieveError};
use crate::file_utils::FileManager;
use crate::language_utils::LanguagePair;
use crate::service::TranslationApi;
use crate::workflow::cancel::CancelSignal;
use crate::workflow::job::JobStatus;
use crate::workflow::poller::{PollOutcome, PollPolicy, StatusPoller};
use crate::workflow::retriever::ResultRetriever;

/// Final recorded result of processing one source item
#[derive(Debug)]
pub enum ItemOutcome {
    /// The translated artifact landed at the destination
    Success {
        /// Source file this outcome belongs to
        source: PathBuf,
        /// Where the artifact was written
        destination: PathBuf,
        /// Wall-clock time for the whole item
        elapsed: Duration,
    },
    /// The item failed; siblings in a batch are unaffected
    Failure {
        /// Source file this outcome belongs to
        source: PathBuf,
        /// Why the item failed
        reason: FailureReason,
        /// Wall-clock time until the failure
        elapsed: Duration,
    },
}

impl ItemOutcome {
    /// The source file this outcome belongs to
    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    /// Whether the item produced a translated destination
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// One human-readable line for logs and the run report
    pub fn summary_line(&self) -> String {
        match self {
            Self::Success {
                source,
                destination,
                elapsed,
            } => format!(
                "OK   {:?} -> {:?} ({:.1}s)",
                source,
                destination,
                elapsed.as_secs_f64()
            ),
            Self::Failure {
                source,
                reason,
                elapsed,
            } => format!(
                "FAIL {:?} [{}] {} ({:.1}s)",
                source,
                reason.code(),
                reason,
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Composes submission, polling, and retrieval for one document
#[derive(Clone)]
pub struct SingleItemWorkflow {
    /// Shared service handle, read-only after construction
    api: Arc<dyn TranslationApi>,
    /// Poller owning the wait/backoff policy
    poller: StatusPoller,
    /// Language pair for every item this workflow processes
    languages: LanguagePair,
}

impl SingleItemWorkflow {
    /// Create a workflow over a shared service handle
    pub fn new(api: Arc<dyn TranslationApi>, policy: PollPolicy, languages: LanguagePair) -> Self {
        Self {
            api,
            poller: StatusPoller::new(policy),
            languages,
        }
    }

    /// Process one document end to end.
    ///
    /// Always returns an outcome; every failure branch maps to one of the
    /// closed [`FailureReason`] variants.
    pub async fn run(&self, source: &Path, destination: &Path, cancel: &CancelSignal) -> ItemOutcome {
        let started = std::time::Instant::now();
        match self.execute(source, destination, cancel).await {
            Ok(()) => ItemOutcome::Success {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                elapsed: started.elapsed(),
            },
            Err(reason) => ItemOutcome::Failure {
                source: source.to_path_buf(),
                reason,
                elapsed: started.elapsed(),
            },
        }
    }

    async fn execute(
        &self,
        source: &Path,
        destination: &Path,
        cancel: &CancelSignal,
    ) -> Result<(), FailureReason> {
        if cancel.is_cancelled() {
            return Err(FailureReason::Cancelled);
        }

        // Local read pre-check: a permission problem here must never
        // reach the service.
        FileManager::check_read_access(source)
            .map_err(|e| FailureReason::LocalReadDenied(e.to_string()))?;
        let content = FileManager::read_bytes(source)
            .map_err(|e| FailureReason::LocalReadDenied(e.to_string()))?;

        let filename = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());

        let handle = self
            .api
            .submit_document(
                Bytes::from(content),
                &filename,
                self.languages.source_code(),
                &self.languages.target,
            )
            .await
            .map_err(|e| FailureReason::RemoteSubmitFailed(e.to_string()))?;
        info!("Submitted {:?} as job {}", source, handle);

        let snapshot = match self
            .poller
            .wait_until_terminal(self.api.as_ref(), &handle, cancel)
            .await
        {
            Ok(PollOutcome::Terminal(snapshot)) => snapshot,
            Ok(PollOutcome::WaitExceeded { waited, attempts }) => {
                debug!(
                    "Job {} not terminal after {} attempt(s) over {:?}",
                    handle, attempts, waited
                );
                return Err(FailureReason::WaitExceeded {
                    waited_secs: waited.as_secs(),
                });
            }
            Ok(PollOutcome::Cancelled) => return Err(FailureReason::Cancelled),
            Err(e) if e.is_transient() => {
                return Err(FailureReason::RemoteTransportError(e.to_string()));
            }
            // The service no longer recognizes the job (or us); the item
            // is as failed as the job itself.
            Err(e) => {
                return Err(FailureReason::RemoteJobFailed {
                    detail: Some(e.to_string()),
                });
            }
        };

        match snapshot.status {
            JobStatus::Completed => {}
            _ => {
                return Err(FailureReason::RemoteJobFailed {
                    detail: snapshot.substatus.clone(),
                });
            }
        }

        // The artifact exists remotely now; if the destination is not
        // writable it is lost to this run, never retried automatically.
        let dest_dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        FileManager::ensure_dir(&dest_dir)
            .map_err(|e| FailureReason::LocalWriteDenied(e.to_string()))?;
        FileManager::check_write_access(&dest_dir)
            .map_err(|e| FailureReason::LocalWriteDenied(e.to_string()))?;

        ResultRetriever::retrieve(self.api.as_ref(), &handle, &snapshot, destination)
            .await
            .map_err(|e| match e {
                RetrieveError::LocalWrite(msg) => FailureReason::LocalWriteDenied(msg),
                RetrieveError::Remote(se) if se.is_transient() => {
                    FailureReason::RemoteTransportError(se.to_string())
                }
                other => FailureReason::RemoteJobFailed {
                    detail: Some(other.to_string()),
                },
            })?;

        Ok(())
    }
}
