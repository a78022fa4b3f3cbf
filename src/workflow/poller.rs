/*!
 * Poll-until-terminal state tracking.
 *
 * A submitted job moves `Queued -> Processing -> {Completed | Failed |
 * Cancelled}` on the service side. The poller re-queries the job until a
 * terminal snapshot appears, sleeping a mildly backing-off interval
 * between attempts so the service is not hammered, and bounding the whole
 * wait so a stuck job cannot block the caller forever.
 */

use std::time::Duration;

use log::{debug, warn};
use rand::Rng;
use tokio::time::Instant;

use crate::app_config::PollingConfig;
use crate::errors::ServiceError;
use crate::service::TranslationApi;
use crate::workflow::cancel::CancelSignal;
use crate::workflow::job::{DocumentStatus, JobHandle};

/// Wait/backoff policy owned by the poller
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay before the second status query
    pub initial_interval: Duration,
    /// Ceiling for the backed-off delay
    pub max_interval: Duration,
    /// Growth factor applied after each non-terminal poll
    pub backoff_multiplier: f64,
    /// Overall wall-clock bound on the wait
    pub max_wait: Duration,
    /// Consecutive transient poll errors tolerated before escalating
    pub transient_retries: u32,
    /// Randomize each delay slightly to spread out concurrent pollers
    pub jitter: bool,
}

impl PollPolicy {
    /// Build a policy from the configuration knobs
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(config.initial_interval_ms),
            max_interval: Duration::from_millis(config.max_interval_ms),
            backoff_multiplier: config.backoff_multiplier,
            max_wait: Duration::from_secs(config.max_wait_secs),
            transient_retries: config.transient_retries,
            jitter: true,
        }
    }

    /// The delay to apply after a delay of `current`
    fn next_interval(&self, current: Duration) -> Duration {
        let grown = current.mul_f64(self.backoff_multiplier);
        grown.min(self.max_interval)
    }

    /// Apply jitter to a delay if enabled
    fn jittered(&self, interval: Duration) -> Duration {
        if !self.jitter {
            return interval;
        }
        let factor: f64 = rand::rng().random_range(0.85..=1.15);
        interval.mul_f64(factor)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

/// How a bounded wait for one job ended
#[derive(Debug)]
pub enum PollOutcome {
    /// A terminal snapshot was observed; no further polling occurs
    Terminal(DocumentStatus),
    /// The wait bound was exhausted without a terminal status
    WaitExceeded {
        /// Wall-clock time spent waiting
        waited: Duration,
        /// Status queries issued
        attempts: usize,
    },
    /// The cancellation signal tripped mid-wait
    Cancelled,
}

/// Repeatedly queries job state until a terminal status, the wait bound,
/// or cancellation
#[derive(Debug, Clone)]
pub struct StatusPoller {
    policy: PollPolicy,
}

impl StatusPoller {
    /// Create a poller with the given policy
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Poll the job until it reaches a terminal state.
    ///
    /// Transient transport errors on individual attempts are absorbed up
    /// to the configured budget (the counter resets on any successful
    /// poll); terminal service errors abort immediately. The in-between
    /// sleeps race the cancellation signal, so a cancel is observed
    /// without waiting out the full interval.
    pub async fn wait_until_terminal(
        &self,
        api: &dyn TranslationApi,
        handle: &JobHandle,
        cancel: &CancelSignal,
    ) -> Result<PollOutcome, ServiceError> {
        let started = Instant::now();
        let deadline = started + self.policy.max_wait;
        let mut interval = self.policy.initial_interval;
        let mut transient_failures: u32 = 0;
        let mut attempts: usize = 0;

        loop {
            if cancel.is_cancelled() {
                return Ok(PollOutcome::Cancelled);
            }

            attempts += 1;
            match api.job_status(handle).await {
                Ok(snapshot) => {
                    transient_failures = 0;
                    if snapshot.is_terminal() {
                        debug!(
                            "Job {} terminal after {} attempt(s): {}",
                            handle, attempts, snapshot.status
                        );
                        return Ok(PollOutcome::Terminal(snapshot));
                    }
                    debug!("Job {} still {}", handle, snapshot.status);
                }
                Err(e) if e.is_transient() => {
                    transient_failures += 1;
                    if transient_failures > self.policy.transient_retries {
                        warn!(
                            "Job {}: giving up after {} consecutive transient errors",
                            handle, transient_failures
                        );
                        return Err(e);
                    }
                    warn!(
                        "Job {}: transient poll error ({}/{}): {}",
                        handle, transient_failures, self.policy.transient_retries, e
                    );
                }
                // Handle gone, key rejected: no amount of waiting helps
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(PollOutcome::WaitExceeded {
                    waited: started.elapsed(),
                    attempts,
                });
            }

            // Never sleep past the deadline
            let delay = self.policy.jittered(interval).min(deadline - now);
            tokio::select! {
                _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }

            interval = self.policy.next_interval(interval);
        }
    }
}
