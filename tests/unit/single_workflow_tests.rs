/*!
 * Tests for the one-document workflow
 */

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use doctrans::errors::FailureReason;
use doctrans::service::mock::{MockBehavior, MockTranslationApi};
use doctrans::workflow::cancel::CancelSignal;
use doctrans::workflow::single::ItemOutcome;

use crate::common;

/// The happy path produces a success outcome and a translated destination
#[tokio::test]
async fn test_single_workflow_with_working_service_should_succeed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_document(&temp_dir.path().to_path_buf(), "doc.txt")?;
    let dest = temp_dir.path().join("doc_translated.txt");

    let api = Arc::new(MockTranslationApi::working());
    let workflow = common::make_workflow(api.clone(), common::fast_policy());

    let outcome = workflow.run(&source, &dest, &CancelSignal::new()).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.source(), source.as_path());
    let written = fs::read_to_string(&dest)?;
    assert!(written.starts_with("[translated] "));

    Ok(())
}

/// An unreadable source short-circuits before anything is submitted
#[tokio::test]
async fn test_single_workflow_with_missing_source_should_not_submit() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("does_not_exist.txt");
    let dest = temp_dir.path().join("out.txt");

    let api = Arc::new(MockTranslationApi::working());
    let workflow = common::make_workflow(api.clone(), common::fast_policy());

    let outcome = workflow.run(&source, &dest, &CancelSignal::new()).await;

    match outcome {
        ItemOutcome::Failure { reason, .. } => {
            assert!(matches!(reason, FailureReason::LocalReadDenied(_)));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(api.stats().submit_calls, 0);

    Ok(())
}

/// A rejected submission maps to the submit-failed reason
#[tokio::test]
async fn test_single_workflow_with_rejected_submission_should_fail_typed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_document(&temp_dir.path().to_path_buf(), "doc.txt")?;
    let dest = temp_dir.path().join("out.txt");

    let api = Arc::new(MockTranslationApi::rejecting_submit());
    let workflow = common::make_workflow(api.clone(), common::fast_policy());

    let outcome = workflow.run(&source, &dest, &CancelSignal::new()).await;

    match outcome {
        ItemOutcome::Failure { reason, .. } => {
            assert!(matches!(reason, FailureReason::RemoteSubmitFailed(_)));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    // The poller never ran for a submission that produced no handle
    assert_eq!(api.stats().status_calls, 0);

    Ok(())
}

/// A remotely failed job carries the service's diagnostic detail
#[tokio::test]
async fn test_single_workflow_with_failed_job_should_carry_substatus() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_document(&temp_dir.path().to_path_buf(), "doc.txt")?;
    let dest = temp_dir.path().join("out.txt");

    let api = Arc::new(MockTranslationApi::failing_jobs("unsupported format"));
    let workflow = common::make_workflow(api.clone(), common::fast_policy());

    let outcome = workflow.run(&source, &dest, &CancelSignal::new()).await;

    match outcome {
        ItemOutcome::Failure { reason, .. } => match reason {
            FailureReason::RemoteJobFailed { detail } => {
                assert_eq!(detail.as_deref(), Some("unsupported format"));
            }
            other => panic!("expected remote-job-failed, got {}", other),
        },
        other => panic!("expected failure, got {:?}", other),
    }
    // No retrieval is attempted for a failed job
    assert_eq!(api.stats().fetch_calls, 0);
    assert!(!dest.exists());

    Ok(())
}

/// A job that never finishes yields the wait-exceeded reason
#[tokio::test]
async fn test_single_workflow_with_stuck_job_should_report_wait_exceeded() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_document(&temp_dir.path().to_path_buf(), "doc.txt")?;
    let dest = temp_dir.path().join("out.txt");

    let api = Arc::new(MockTranslationApi::never_finishes());
    let policy = common::fast_policy_with_max_wait(Duration::from_millis(80));
    let workflow = common::make_workflow(api, policy);

    let outcome = workflow.run(&source, &dest, &CancelSignal::new()).await;

    match outcome {
        ItemOutcome::Failure { reason, .. } => {
            assert!(matches!(reason, FailureReason::WaitExceeded { .. }));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    Ok(())
}

/// An unwritable destination directory maps to the write-denied reason
#[tokio::test]
async fn test_single_workflow_with_unwritable_destination_should_fail_typed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_document(&temp_dir.path().to_path_buf(), "doc.txt")?;
    // The destination's parent is a regular file, so the directory can
    // neither exist nor be created.
    let blocker = common::create_test_file(&temp_dir.path().to_path_buf(), "blocker", "not a dir")?;
    let dest = blocker.join("out.txt");

    let api = Arc::new(MockTranslationApi::working());
    let workflow = common::make_workflow(api.clone(), common::fast_policy());

    let outcome = workflow.run(&source, &dest, &CancelSignal::new()).await;

    match outcome {
        ItemOutcome::Failure { reason, .. } => {
            assert!(matches!(reason, FailureReason::LocalWriteDenied(_)));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    // The job did complete remotely; only the local landing failed
    assert_eq!(api.stats().fetch_calls, 0);

    Ok(())
}

/// A workflow started after cancellation records the cancelled reason
#[tokio::test]
async fn test_single_workflow_with_tripped_cancel_should_record_cancelled() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_document(&temp_dir.path().to_path_buf(), "doc.txt")?;
    let dest = temp_dir.path().join("out.txt");

    let api = Arc::new(MockTranslationApi::working());
    let workflow = common::make_workflow(api.clone(), common::fast_policy());

    let cancel = CancelSignal::new();
    cancel.cancel();
    let outcome = workflow.run(&source, &dest, &cancel).await;

    match outcome {
        ItemOutcome::Failure { reason, .. } => {
            assert!(matches!(reason, FailureReason::Cancelled));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(api.stats().submit_calls, 0);

    Ok(())
}
