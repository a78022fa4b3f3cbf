/*!
 * Result retrieval for completed jobs.
 *
 * Downloads the translated artifact and lands it atomically: the payload
 * is written to a temp file next to the destination and renamed into
 * place only once fully flushed, so observers never see a partial file.
 */

use std::path::Path;

use log::debug;

use crate::errors::RetrieveError;
use crate::file_utils::FileManager;
use crate::service::TranslationApi;
use crate::workflow::job::{DocumentStatus, JobHandle};

/// Streams a completed job's artifact to a destination path
pub struct ResultRetriever;

impl ResultRetriever {
    /// Retrieve the artifact of `handle` into `dest`.
    ///
    /// `last_status` must be the terminal snapshot the poller returned;
    /// anything other than `Completed` is a caller bug and is rejected
    /// here without touching the service. Remote delivery failures and
    /// local write failures come back as distinct variants.
    pub async fn retrieve(
        api: &dyn TranslationApi,
        handle: &JobHandle,
        last_status: &DocumentStatus,
        dest: &Path,
    ) -> Result<(), RetrieveError> {
        if !last_status.status.is_success() {
            return Err(RetrieveError::NotCompleted(last_status.status));
        }

        let payload = api.fetch_result(handle).await?;
        debug!(
            "Fetched {} byte(s) for job {}, writing {:?}",
            payload.len(),
            handle,
            dest
        );

        FileManager::write_atomic(dest, &payload)
            .map_err(|e| RetrieveError::LocalWrite(e.to_string()))?;

        Ok(())
    }
}
