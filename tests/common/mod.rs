/*!
 * Common test utilities for the doctrans test suite
 */

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;

use doctrans::language_utils::LanguagePair;
use doctrans::service::TranslationApi;
use doctrans::workflow::poller::PollPolicy;
use doctrans::workflow::single::SingleItemWorkflow;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a small sample document for translation tests
pub fn create_test_document(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "One sentence to translate.\nAnd another one.\n")
}

/// A poll policy with intervals small enough for tests to run quickly
pub fn fast_policy() -> PollPolicy {
    PollPolicy {
        initial_interval: Duration::from_millis(5),
        max_interval: Duration::from_millis(20),
        backoff_multiplier: 1.5,
        max_wait: Duration::from_secs(5),
        transient_retries: 3,
        jitter: false,
    }
}

/// Same as [`fast_policy`] but with the overall wait bound lowered
pub fn fast_policy_with_max_wait(max_wait: Duration) -> PollPolicy {
    PollPolicy {
        max_wait,
        ..fast_policy()
    }
}

/// Build a single-item workflow over the given service handle
pub fn make_workflow(api: Arc<dyn TranslationApi>, policy: PollPolicy) -> SingleItemWorkflow {
    let languages = LanguagePair::parse("en", "fr").expect("valid test language pair");
    SingleItemWorkflow::new(api, policy, languages)
}
