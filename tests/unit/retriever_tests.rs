/*!
 * Tests for result retrieval
 */

use anyhow::Result;
use bytes::Bytes;
use std::fs;

use doctrans::errors::RetrieveError;
use doctrans::service::TranslationApi;
use doctrans::service::mock::MockTranslationApi;
use doctrans::workflow::job::{DocumentStatus, JobStatus};
use doctrans::workflow::retriever::ResultRetriever;

use crate::common;

/// Retrieval of a completed job lands the artifact at the destination
#[tokio::test]
async fn test_retrieve_with_completed_job_should_write_destination() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dest = temp_dir.path().join("out.txt");

    let api = MockTranslationApi::instant();
    let handle = api
        .submit_document(Bytes::from_static(b"bonjour"), "doc.txt", None, "fr")
        .await?;

    let completed = DocumentStatus::of(JobStatus::Completed);
    ResultRetriever::retrieve(&api, &handle, &completed, &dest).await?;

    let written = fs::read_to_string(&dest)?;
    assert_eq!(written, "[translated] bonjour");

    Ok(())
}

/// Retrieval over an existing destination replaces it completely
#[tokio::test]
async fn test_retrieve_with_existing_destination_should_overwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dest = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "out.txt",
        "stale content from a previous run",
    )?;

    let api = MockTranslationApi::instant();
    let handle = api
        .submit_document(Bytes::from_static(b"fresh"), "doc.txt", None, "fr")
        .await?;

    let completed = DocumentStatus::of(JobStatus::Completed);
    ResultRetriever::retrieve(&api, &handle, &completed, &dest).await?;

    assert_eq!(fs::read_to_string(&dest)?, "[translated] fresh");

    Ok(())
}

/// Calling retrieve on a non-completed job is rejected without a remote call
#[tokio::test]
async fn test_retrieve_with_failed_job_should_reject_without_remote_call() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dest = temp_dir.path().join("out.txt");

    let api = MockTranslationApi::instant();
    let handle = api
        .submit_document(Bytes::from_static(b"payload"), "doc.txt", None, "fr")
        .await?;

    for status in [JobStatus::Failed, JobStatus::Cancelled, JobStatus::Processing] {
        let snapshot = DocumentStatus::of(status);
        let result = ResultRetriever::retrieve(&api, &handle, &snapshot, &dest).await;
        assert!(matches!(result, Err(RetrieveError::NotCompleted(_))));
    }

    assert_eq!(api.stats().fetch_calls, 0);
    assert!(!dest.exists());

    Ok(())
}

/// A remote delivery failure leaves no partial destination behind
#[tokio::test]
async fn test_retrieve_with_remote_failure_should_leave_no_destination() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dest = temp_dir.path().join("out.txt");

    let api = MockTranslationApi::new(doctrans::service::mock::MockBehavior::CompleteButFetchFails);
    let handle = api
        .submit_document(Bytes::from_static(b"payload"), "doc.txt", None, "fr")
        .await?;

    let completed = DocumentStatus::of(JobStatus::Completed);
    let result = ResultRetriever::retrieve(&api, &handle, &completed, &dest).await;

    assert!(matches!(result, Err(RetrieveError::Remote(_))));
    assert!(!dest.exists());

    Ok(())
}
