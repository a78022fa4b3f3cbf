/*!
 * Tests for the error taxonomy
 */

use doctrans::errors::{FailureReason, ServiceError};

/// Transport and overload errors are worth retrying; the rest are not
#[test]
fn test_service_error_is_transient_should_split_taxonomy() {
    assert!(ServiceError::Transport("connection reset".to_string()).is_transient());
    assert!(
        ServiceError::Api {
            status_code: 503,
            message: "overloaded".to_string()
        }
        .is_transient()
    );
    assert!(
        ServiceError::Api {
            status_code: 429,
            message: "slow down".to_string()
        }
        .is_transient()
    );

    assert!(
        !ServiceError::Api {
            status_code: 422,
            message: "bad document".to_string()
        }
        .is_transient()
    );
    assert!(!ServiceError::JobNotFound("job-9".to_string()).is_transient());
    assert!(!ServiceError::Unauthorized("bad key".to_string()).is_transient());
    assert!(!ServiceError::ParseError("truncated body".to_string()).is_transient());
}

/// Every failure reason has a stable code for report lines
#[test]
fn test_failure_reason_codes_should_be_distinct() {
    let reasons = [
        FailureReason::LocalReadDenied("x".to_string()),
        FailureReason::LocalWriteDenied("x".to_string()),
        FailureReason::RemoteSubmitFailed("x".to_string()),
        FailureReason::RemoteJobFailed { detail: None },
        FailureReason::RemoteTransportError("x".to_string()),
        FailureReason::WaitExceeded { waited_secs: 1 },
        FailureReason::Cancelled,
    ];

    let mut codes: Vec<&str> = reasons.iter().map(|r| r.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), reasons.len());
}

/// The remote-job-failed message carries the substatus when present
#[test]
fn test_failure_reason_display_should_include_detail() {
    let with_detail = FailureReason::RemoteJobFailed {
        detail: Some("glossary missing".to_string()),
    };
    assert_eq!(with_detail.to_string(), "Job failed remotely: glossary missing");

    let without_detail = FailureReason::RemoteJobFailed { detail: None };
    assert_eq!(without_detail.to_string(), "Job failed remotely");

    let wait = FailureReason::WaitExceeded { waited_secs: 90 };
    assert_eq!(wait.to_string(), "Gave up waiting after 90s");
}
