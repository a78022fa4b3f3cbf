/*!
 * Remote translation-service boundary.
 *
 * This module defines the contract the orchestration core depends on,
 * plus the client implementations:
 * - `http`: reqwest-based client for the real service
 * - `mock`: scripted in-memory client for tests and benches
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ServiceError;
use crate::workflow::job::{DocumentStatus, JobHandle};

/// A translation engine offered by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    /// Engine identifier used in requests
    pub id: String,
    /// Human-readable engine name
    pub name: String,
}

/// A supported source/target language pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDirection {
    /// Source language code
    pub source: String,
    /// Target language code
    pub target: String,
}

/// Contract exposed by the remote translation service.
///
/// One shared handle is constructed at startup and passed explicitly to
/// every workflow invocation; implementations are read-only after
/// construction so concurrent items can issue independent requests
/// without locking.
#[async_trait]
pub trait TranslationApi: Send + Sync + Debug {
    /// Submit a document for translation and obtain a job handle.
    ///
    /// Not idempotent: every call creates a new job on the service side.
    /// `source` of `None` asks the service to auto-detect the language.
    async fn submit_document(
        &self,
        content: Bytes,
        filename: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<JobHandle, ServiceError>;

    /// Query the current status of a submitted job
    async fn job_status(&self, handle: &JobHandle) -> Result<DocumentStatus, ServiceError>;

    /// Download the translated artifact of a completed job
    async fn fetch_result(&self, handle: &JobHandle) -> Result<Bytes, ServiceError>;

    /// List the translation engines the service offers
    async fn list_engines(&self) -> Result<Vec<Engine>, ServiceError>;

    /// List the language directions the service supports
    async fn list_language_directions(&self) -> Result<Vec<LanguageDirection>, ServiceError>;
}

pub mod http;
pub mod mock;
