/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

use crate::workflow::job::JobStatus;

/// Errors reported by the remote translation service boundary
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error reaching the service at all (connection reset, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error returned by the service itself
    #[error("API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// The service does not know the referenced job
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    /// Error when parsing a service response fails
    #[error("Failed to parse service response: {0}")]
    ParseError(String),
}

impl ServiceError {
    /// Whether a failed call is worth retrying on the next poll attempt.
    ///
    /// Transport hiccups and server-side overload come and go; a missing
    /// job or a rejected key will not fix itself.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status_code, .. } => *status_code == 429 || *status_code >= 500,
            Self::JobNotFound(_) | Self::Unauthorized(_) | Self::ParseError(_) => false,
        }
    }
}

/// Errors that can occur while retrieving a completed job's artifact
#[derive(Error, Debug)]
pub enum RetrieveError {
    /// Retrieval was attempted on a job that is not in terminal success
    #[error("Result retrieval requires a completed job, observed status: {0}")]
    NotCompleted(JobStatus),

    /// The remote side failed to deliver the artifact
    #[error("Remote retrieval failed: {0}")]
    Remote(#[from] ServiceError),

    /// The artifact arrived but could not be written locally
    #[error("Failed to write destination: {0}")]
    LocalWrite(String),
}

/// Closed set of reasons a single item can fail inside a batch
#[derive(Error, Debug)]
pub enum FailureReason {
    /// The source file could not be opened for reading
    #[error("Source not readable: {0}")]
    LocalReadDenied(String),

    /// The destination directory refused the write
    #[error("Destination not writable: {0}")]
    LocalWriteDenied(String),

    /// The service rejected or never accepted the submission
    #[error("Submission failed: {0}")]
    RemoteSubmitFailed(String),

    /// The job reached a terminal failure or cancelled state on the service
    #[error("Job failed remotely{}", .detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    RemoteJobFailed {
        /// Diagnostic substatus reported by the service, if any
        detail: Option<String>,
    },

    /// Transport errors persisted past the retry budget
    #[error("Transport error: {0}")]
    RemoteTransportError(String),

    /// The polling bound was exhausted without a terminal status
    #[error("Gave up waiting after {waited_secs}s")]
    WaitExceeded {
        /// Wall-clock seconds spent waiting
        waited_secs: u64,
    },

    /// External cancellation observed mid-workflow
    #[error("Cancelled")]
    Cancelled,
}

impl FailureReason {
    // @returns: Stable lowercase tag for summary lines
    pub fn code(&self) -> &'static str {
        match self {
            Self::LocalReadDenied(_) => "local-read-denied",
            Self::LocalWriteDenied(_) => "local-write-denied",
            Self::RemoteSubmitFailed(_) => "remote-submit-failed",
            Self::RemoteJobFailed { .. } => "remote-job-failed",
            Self::RemoteTransportError(_) => "remote-transport-error",
            Self::WaitExceeded { .. } => "wait-exceeded",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading or validating configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from the remote service
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Error from result retrieval
    #[error("Retrieval error: {0}")]
    Retrieve(#[from] RetrieveError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
