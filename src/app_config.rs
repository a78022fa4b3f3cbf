use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), "auto" to let the service detect it
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Remote service connection settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Poll wait/backoff policy
    #[serde(default)]
    pub polling: PollingConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote translation-service connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceConfig {
    // @field: Service URL, empty for the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Wait/backoff policy for status polling
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PollingConfig {
    /// Delay before the second status query, in milliseconds
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,

    /// Ceiling for the backed-off delay, in milliseconds
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Growth factor applied to the delay after each non-terminal poll
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Overall wall-clock bound on waiting for one job, in seconds
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Consecutive transient poll errors tolerated before giving up
    #[serde(default = "default_transient_retries")]
    pub transient_retries: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_wait_secs: default_max_wait_secs(),
            transient_retries: default_transient_retries(),
        }
    }
}

/// Batch processing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Maximum items translated at the same time
    #[serde(default = "default_concurrent_items")]
    pub concurrent_items: usize,

    /// File extensions considered translatable sources
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Per-run summary lines are appended to this file
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrent_items: default_concurrent_items(),
            file_extensions: default_file_extensions(),
            report_file: default_report_file(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            service: ServiceConfig::default(),
            polling: PollingConfig::default(),
            batch: BatchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.source_language != "auto" && !self.source_language.is_empty() {
            language_utils::validate_language_code(&self.source_language)
                .map_err(|e| anyhow!("Invalid source language: {}", e))?;
        }
        language_utils::validate_language_code(&self.target_language)
            .map_err(|e| anyhow!("Invalid target language: {}", e))?;

        if self.batch.concurrent_items == 0 {
            return Err(anyhow!("batch.concurrent_items must be at least 1"));
        }
        if self.batch.file_extensions.is_empty() {
            return Err(anyhow!("batch.file_extensions must not be empty"));
        }
        if self.polling.initial_interval_ms == 0 {
            return Err(anyhow!("polling.initial_interval_ms must be greater than zero"));
        }
        if self.polling.backoff_multiplier < 1.0 {
            return Err(anyhow!("polling.backoff_multiplier must be at least 1.0"));
        }
        if self.polling.max_wait_secs == 0 {
            return Err(anyhow!("polling.max_wait_secs must be greater than zero"));
        }

        Ok(())
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "fr".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_initial_interval_ms() -> u64 {
    1000
}

fn default_max_interval_ms() -> u64 {
    15000
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

fn default_max_wait_secs() -> u64 {
    600
}

fn default_transient_retries() -> u32 {
    3
}

fn default_concurrent_items() -> usize {
    4
}

fn default_file_extensions() -> Vec<String> {
    vec![
        "txt".to_string(),
        "md".to_string(),
        "html".to_string(),
        "docx".to_string(),
    ]
}

fn default_report_file() -> String {
    "doctrans-report.log".to_string()
}
