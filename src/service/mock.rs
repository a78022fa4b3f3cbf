/*!
 * Mock translation service for testing.
 *
 * This module provides a scripted in-memory [`TranslationApi`] so the
 * orchestration core can be exercised without network access:
 * - `MockTranslationApi::working()` - every job completes after a few polls
 * - `MockTranslationApi::never_finishes()` - jobs stay in processing forever
 * - `MockTranslationApi::rejecting_submit()` - submission is refused
 * - per-filename behavior overrides for mixed batches
 *
 * Every call is counted and the peak number of simultaneously in-flight
 * calls is recorded, which is what the bounded-concurrency tests assert on.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::errors::ServiceError;
use crate::service::{Engine, LanguageDirection, TranslationApi};
use crate::workflow::job::{DocumentStatus, JobHandle, JobStatus};

/// How the mock treats one job from submission to terminal state
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Report `Processing` for the given number of polls, then `Completed`
    CompleteAfter {
        /// Non-terminal polls before completion
        polls: usize,
    },
    /// Never leave `Processing`
    NeverFinishes,
    /// Reach terminal `Failed` with the given substatus after one poll
    FailWith {
        /// Substatus detail reported alongside the failure
        detail: Option<String>,
    },
    /// Reach terminal `Cancelled` (service side) after one poll
    CancelRemotely,
    /// Refuse the submission itself with an API error
    RejectSubmit,
    /// First N status calls fail transiently, then the job completes
    FlakyThenComplete {
        /// Transient errors to emit before the first real snapshot
        failures: usize,
    },
    /// Status calls report the job as unknown
    VanishAfterSubmit,
    /// Complete normally but fail the artifact download
    CompleteButFetchFails,
}

/// Call accounting shared by all clones of a mock
#[derive(Debug, Default, Clone)]
pub struct CallStats {
    /// Number of submit_document calls
    pub submit_calls: usize,
    /// Number of job_status calls
    pub status_calls: usize,
    /// Number of fetch_result calls
    pub fetch_calls: usize,
    /// Number of listing calls (engines + directions)
    pub list_calls: usize,
    /// Calls currently in flight
    pub in_flight: usize,
    /// Peak simultaneous in-flight calls
    pub max_in_flight: usize,
}

/// Bookkeeping for one accepted job
#[derive(Debug)]
struct MockJob {
    behavior: MockBehavior,
    content: Bytes,
    polls: usize,
    transient_errors_left: usize,
}

/// Scripted in-memory translation service
#[derive(Debug)]
pub struct MockTranslationApi {
    default_behavior: MockBehavior,
    overrides: Mutex<HashMap<String, MockBehavior>>,
    jobs: Mutex<HashMap<String, MockJob>>,
    stats: Arc<Mutex<CallStats>>,
    next_id: Mutex<usize>,
    call_delay: Option<Duration>,
}

/// Decrements the in-flight gauge when a call returns
struct InFlightGuard {
    stats: Arc<Mutex<CallStats>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.stats.lock().in_flight -= 1;
    }
}

impl MockTranslationApi {
    /// Create a mock with the given default behavior
    pub fn new(default_behavior: MockBehavior) -> Self {
        Self {
            default_behavior,
            overrides: Mutex::new(HashMap::new()),
            jobs: Mutex::new(HashMap::new()),
            stats: Arc::new(Mutex::new(CallStats::default())),
            next_id: Mutex::new(0),
            call_delay: None,
        }
    }

    /// Every job completes after two non-terminal polls
    pub fn working() -> Self {
        Self::new(MockBehavior::CompleteAfter { polls: 2 })
    }

    /// Every job completes on the very first poll
    pub fn instant() -> Self {
        Self::new(MockBehavior::CompleteAfter { polls: 0 })
    }

    /// Jobs never leave the processing state
    pub fn never_finishes() -> Self {
        Self::new(MockBehavior::NeverFinishes)
    }

    /// Submissions are refused outright
    pub fn rejecting_submit() -> Self {
        Self::new(MockBehavior::RejectSubmit)
    }

    /// Jobs reach a terminal failure with the given detail
    pub fn failing_jobs(detail: &str) -> Self {
        Self::new(MockBehavior::FailWith {
            detail: Some(detail.to_string()),
        })
    }

    /// Override the behavior for one submitted filename
    pub fn with_behavior_for(self, filename: &str, behavior: MockBehavior) -> Self {
        self.overrides.lock().insert(filename.to_string(), behavior);
        self
    }

    /// Hold every call open for the given duration.
    ///
    /// Makes concurrent overlap observable to the in-flight gauge.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    /// Snapshot of the call accounting
    pub fn stats(&self) -> CallStats {
        self.stats.lock().clone()
    }

    /// Register a call start and return the guard that ends it
    fn enter(&self) -> InFlightGuard {
        {
            let mut stats = self.stats.lock();
            stats.in_flight += 1;
            if stats.in_flight > stats.max_in_flight {
                stats.max_in_flight = stats.in_flight;
            }
        }
        InFlightGuard {
            stats: self.stats.clone(),
        }
    }

    /// Simulate service latency if configured
    async fn simulate_latency(&self) {
        if let Some(delay) = self.call_delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn behavior_for(&self, filename: &str) -> MockBehavior {
        self.overrides
            .lock()
            .get(filename)
            .cloned()
            .unwrap_or_else(|| self.default_behavior.clone())
    }
}

#[async_trait]
impl TranslationApi for MockTranslationApi {
    async fn submit_document(
        &self,
        content: Bytes,
        filename: &str,
        _source: Option<&str>,
        _target: &str,
    ) -> Result<JobHandle, ServiceError> {
        let _guard = self.enter();
        self.stats.lock().submit_calls += 1;
        self.simulate_latency().await;

        let behavior = self.behavior_for(filename);
        if matches!(behavior, MockBehavior::RejectSubmit) {
            return Err(ServiceError::Api {
                status_code: 422,
                message: format!("Document rejected: {}", filename),
            });
        }

        let id = {
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            format!("job-{}", *next_id)
        };

        let transient_errors_left = match behavior {
            MockBehavior::FlakyThenComplete { failures } => failures,
            _ => 0,
        };
        self.jobs.lock().insert(
            id.clone(),
            MockJob {
                behavior,
                content,
                polls: 0,
                transient_errors_left,
            },
        );

        Ok(JobHandle::new(id))
    }

    async fn job_status(&self, handle: &JobHandle) -> Result<DocumentStatus, ServiceError> {
        let _guard = self.enter();
        self.stats.lock().status_calls += 1;
        self.simulate_latency().await;

        let mut jobs = self.jobs.lock();
        let job = jobs
            .get_mut(handle.id())
            .ok_or_else(|| ServiceError::JobNotFound(handle.id().to_string()))?;

        if job.transient_errors_left > 0 {
            job.transient_errors_left -= 1;
            return Err(ServiceError::Transport("simulated transport blip".to_string()));
        }

        job.polls += 1;
        let snapshot = match &job.behavior {
            MockBehavior::CompleteAfter { polls: threshold } => {
                if job.polls > *threshold {
                    DocumentStatus::of(JobStatus::Completed)
                } else if job.polls == 1 {
                    DocumentStatus::of(JobStatus::Queued)
                } else {
                    DocumentStatus::of(JobStatus::Processing)
                }
            }
            MockBehavior::FlakyThenComplete { .. } | MockBehavior::CompleteButFetchFails => {
                DocumentStatus::of(JobStatus::Completed)
            }
            MockBehavior::NeverFinishes => DocumentStatus::of(JobStatus::Processing),
            MockBehavior::FailWith { detail } => DocumentStatus {
                status: JobStatus::Failed,
                substatus: detail.clone(),
            },
            MockBehavior::CancelRemotely => DocumentStatus::of(JobStatus::Cancelled),
            MockBehavior::VanishAfterSubmit => {
                return Err(ServiceError::JobNotFound(handle.id().to_string()));
            }
            MockBehavior::RejectSubmit => {
                // A rejected submission never produced a handle to poll
                return Err(ServiceError::JobNotFound(handle.id().to_string()));
            }
        };

        Ok(snapshot)
    }

    async fn fetch_result(&self, handle: &JobHandle) -> Result<Bytes, ServiceError> {
        let _guard = self.enter();
        self.stats.lock().fetch_calls += 1;
        self.simulate_latency().await;

        let jobs = self.jobs.lock();
        let job = jobs
            .get(handle.id())
            .ok_or_else(|| ServiceError::JobNotFound(handle.id().to_string()))?;

        if matches!(job.behavior, MockBehavior::CompleteButFetchFails) {
            return Err(ServiceError::Api {
                status_code: 502,
                message: "artifact store unavailable".to_string(),
            });
        }

        let original = String::from_utf8_lossy(&job.content);
        Ok(Bytes::from(format!("[translated] {}", original)))
    }

    async fn list_engines(&self) -> Result<Vec<Engine>, ServiceError> {
        let _guard = self.enter();
        self.stats.lock().list_calls += 1;
        self.simulate_latency().await;

        Ok(vec![Engine {
            id: "general".to_string(),
            name: "General purpose".to_string(),
        }])
    }

    async fn list_language_directions(&self) -> Result<Vec<LanguageDirection>, ServiceError> {
        let _guard = self.enter();
        self.stats.lock().list_calls += 1;
        self.simulate_latency().await;

        Ok(vec![
            LanguageDirection {
                source: "en".to_string(),
                target: "fr".to_string(),
            },
            LanguageDirection {
                source: "en".to_string(),
                target: "de".to_string(),
            },
        ])
    }
}
