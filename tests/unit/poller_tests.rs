/*!
 * Tests for poll-until-terminal state tracking
 */

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;

use doctrans::service::TranslationApi;
use doctrans::service::mock::{MockBehavior, MockTranslationApi};
use doctrans::workflow::cancel::CancelSignal;
use doctrans::workflow::job::JobStatus;
use doctrans::workflow::poller::{PollOutcome, StatusPoller};

use crate::common;

/// Submit one placeholder document and return its handle
async fn submit_one(api: &MockTranslationApi) -> Result<doctrans::workflow::job::JobHandle> {
    let handle = api
        .submit_document(Bytes::from_static(b"payload"), "doc.txt", Some("en"), "fr")
        .await?;
    Ok(handle)
}

/// A job that is already terminal must be resolved with a single query
#[tokio::test]
async fn test_poller_with_immediately_completed_job_should_query_exactly_once() -> Result<()> {
    let api = MockTranslationApi::instant();
    let handle = submit_one(&api).await?;

    let poller = StatusPoller::new(common::fast_policy());
    let outcome = poller
        .wait_until_terminal(&api, &handle, &CancelSignal::new())
        .await?;

    match outcome {
        PollOutcome::Terminal(snapshot) => assert_eq!(snapshot.status, JobStatus::Completed),
        other => panic!("expected terminal outcome, got {:?}", other),
    }
    assert_eq!(api.stats().status_calls, 1);

    Ok(())
}

/// A job that needs several polls eventually resolves as completed
#[tokio::test]
async fn test_poller_with_slow_job_should_reach_completed() -> Result<()> {
    let api = MockTranslationApi::working();
    let handle = submit_one(&api).await?;

    let poller = StatusPoller::new(common::fast_policy());
    let outcome = poller
        .wait_until_terminal(&api, &handle, &CancelSignal::new())
        .await?;

    assert!(matches!(
        outcome,
        PollOutcome::Terminal(snapshot) if snapshot.status == JobStatus::Completed
    ));
    assert!(api.stats().status_calls >= 3);

    Ok(())
}

/// A job that never leaves processing must end in wait-exceeded, not hang
#[tokio::test]
async fn test_poller_with_stuck_job_should_report_wait_exceeded() -> Result<()> {
    let api = MockTranslationApi::never_finishes();
    let handle = submit_one(&api).await?;

    let policy = common::fast_policy_with_max_wait(Duration::from_millis(100));
    let poller = StatusPoller::new(policy);
    let outcome = poller
        .wait_until_terminal(&api, &handle, &CancelSignal::new())
        .await?;

    match outcome {
        PollOutcome::WaitExceeded { attempts, .. } => assert!(attempts >= 1),
        other => panic!("expected wait-exceeded, got {:?}", other),
    }

    Ok(())
}

/// Transient poll errors within the budget are absorbed
#[tokio::test]
async fn test_poller_with_flaky_transport_should_retry_and_complete() -> Result<()> {
    let api = MockTranslationApi::new(MockBehavior::FlakyThenComplete { failures: 2 });
    let handle = submit_one(&api).await?;

    let poller = StatusPoller::new(common::fast_policy());
    let outcome = poller
        .wait_until_terminal(&api, &handle, &CancelSignal::new())
        .await?;

    assert!(matches!(outcome, PollOutcome::Terminal(_)));
    // Two failed attempts plus the successful one
    assert_eq!(api.stats().status_calls, 3);

    Ok(())
}

/// Transient errors past the budget escalate instead of looping forever
#[tokio::test]
async fn test_poller_with_persistent_transport_errors_should_escalate() -> Result<()> {
    let api = MockTranslationApi::new(MockBehavior::FlakyThenComplete { failures: 10 });
    let handle = submit_one(&api).await?;

    let mut policy = common::fast_policy();
    policy.transient_retries = 2;
    let poller = StatusPoller::new(policy);

    let result = poller
        .wait_until_terminal(&api, &handle, &CancelSignal::new())
        .await;
    assert!(result.is_err());
    assert!(result.unwrap_err().is_transient());

    Ok(())
}

/// A terminal service error aborts immediately without retries
#[tokio::test]
async fn test_poller_with_unknown_job_should_abort_on_first_attempt() -> Result<()> {
    let api = MockTranslationApi::new(MockBehavior::VanishAfterSubmit);
    let handle = submit_one(&api).await?;

    let poller = StatusPoller::new(common::fast_policy());
    let result = poller
        .wait_until_terminal(&api, &handle, &CancelSignal::new())
        .await;

    assert!(result.is_err());
    assert!(!result.unwrap_err().is_transient());
    assert_eq!(api.stats().status_calls, 1);

    Ok(())
}

/// Cancellation is observed mid-wait, well before the overall bound
#[tokio::test]
async fn test_poller_with_cancellation_should_stop_promptly() -> Result<()> {
    let api = Arc::new(MockTranslationApi::never_finishes());
    let handle = submit_one(&api).await?;

    let mut policy = common::fast_policy_with_max_wait(Duration::from_secs(60));
    // A long interval makes it obvious when the cancel is what woke us
    policy.initial_interval = Duration::from_secs(30);
    policy.max_interval = Duration::from_secs(30);
    let poller = StatusPoller::new(policy);

    let cancel = CancelSignal::new();
    let trip = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trip.cancel();
    });

    let started = std::time::Instant::now();
    let outcome = poller
        .wait_until_terminal(api.as_ref(), &handle, &cancel)
        .await?;

    assert!(matches!(outcome, PollOutcome::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(10));

    Ok(())
}
