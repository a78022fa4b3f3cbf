/*!
 * Job identity and status model.
 *
 * A submitted document is tracked by an opaque [`JobHandle`] until it
 * reaches a terminal status. Each poll of the service produces a fresh
 * [`DocumentStatus`] snapshot; no history is kept beyond the latest one.
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Opaque token for one accepted translation request.
///
/// Produced by submission, consumed by status polling and result
/// retrieval. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Service-assigned job identifier
    id: String,
}

impl JobHandle {
    /// Wrap a service-assigned job identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The service-assigned identifier
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Lifecycle state of a translation job on the service side
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    // @status: Accepted, not yet started
    Queued,
    // @status: Translation in progress
    Processing,
    // @status: Terminal success, artifact available
    Completed,
    // @status: Terminal failure
    Failed,
    // @status: Terminal, cancelled on the service side
    Cancelled,
}

impl JobStatus {
    /// No further transition occurs from a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether the artifact can be retrieved
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    // @returns: Lowercase status identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Queued => "queued".to_string(),
            Self::Processing => "processing".to_string(),
            Self::Completed => "completed".to_string(),
            Self::Failed => "failed".to_string(),
            Self::Cancelled => "cancelled".to_string(),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(anyhow!("Invalid job status: {}", s)),
        }
    }
}

/// Snapshot of job progress returned by one status query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStatus {
    /// Current lifecycle state
    pub status: JobStatus,

    /// Free-form diagnostic detail from the service, if any
    #[serde(default)]
    pub substatus: Option<String>,
}

impl DocumentStatus {
    /// Snapshot with no diagnostic detail
    pub fn of(status: JobStatus) -> Self {
        Self { status, substatus: None }
    }

    /// Whether this snapshot ends the polling loop
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
