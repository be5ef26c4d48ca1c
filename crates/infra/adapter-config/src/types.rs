//! Configuration types for the cloud adapters.
//!
//! All fields use `#[serde(default)]` so partial config files work.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 500 MiB, the default dry-run budget for a single query.
pub const DEFAULT_MAX_BYTES: u64 = 500 * 1024 * 1024;

/// Default bound on each external BigQuery call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Root configuration shared by both adapter binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptersConfig {
    /// Query guardrail settings for the BigQuery adapter.
    pub bigquery: BigQuerySettings,

    /// Logging and diagnostics configuration.
    pub logging: LoggingConfig,
}

/// Guardrail settings for the BigQuery adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BigQuerySettings {
    /// Largest dry-run estimate (in bytes) allowed to execute.
    pub max_bytes: u64,

    /// Timeout applied separately to the estimate and the execution.
    pub timeout_secs: u64,
}

impl Default for BigQuerySettings {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter level (trace, debug, info, warn, error).
    pub level: String,

    /// Emit JSON log lines on stderr instead of human-readable ones.
    pub json: bool,

    /// Directory for JSONL tool-call records. Unset disables call records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            call_log_dir: None,
        }
    }
}
