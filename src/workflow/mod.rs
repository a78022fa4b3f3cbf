/*!
 * Orchestration core: submit, poll, retrieve, batch.
 *
 * This module composes the asynchronous document-translation workflow.
 * It is split into several submodules:
 *
 * - `job`: job identity and status snapshots
 * - `cancel`: cooperative cancellation signal
 * - `poller`: poll-until-terminal state tracking with bounded waits
 * - `retriever`: atomic retrieval of completed artifacts
 * - `single`: the one-document workflow and its outcome type
 * - `batch`: bounded fan-out over many documents
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOrchestrator, BatchRun, BatchSummary};
pub use self::cancel::CancelSignal;
pub use self::job::{DocumentStatus, JobHandle, JobStatus};
pub use self::poller::{PollOutcome, PollPolicy, StatusPoller};
pub use self::retriever::ResultRetriever;
pub use self::single::{ItemOutcome, SingleItemWorkflow};

// Submodules
pub mod batch;
pub mod cancel;
pub mod job;
pub mod poller;
pub mod retriever;
pub mod single;
