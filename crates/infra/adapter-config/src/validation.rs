//! Advisory validation for [`AdaptersConfig`].
//!
//! Validation only collects warnings; the binaries log them at startup and
//! carry on with the config as loaded.

use crate::types::AdaptersConfig;

/// An advisory warning about a configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryWarning {
    /// Machine-readable warning code.
    pub code: &'static str,

    /// Human-readable warning message.
    pub message: String,

    /// JSON path to the problematic config field.
    pub path: &'static str,
}

impl std::fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a configuration and return advisory warnings.
pub fn validate(cfg: &AdaptersConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];

    if cfg.bigquery.max_bytes == 0 {
        warnings.push(AdvisoryWarning {
            code: "bigquery.max_bytes.zero",
            path: "bigquery.max_bytes",
            message: "A zero byte limit rejects every query that scans data".into(),
        });
    }

    if cfg.bigquery.timeout_secs == 0 {
        warnings.push(AdvisoryWarning {
            code: "bigquery.timeout_secs.zero",
            path: "bigquery.timeout_secs",
            message: "A zero timeout fails every BigQuery call immediately".into(),
        });
    }

    if !VALID_LEVELS.contains(&cfg.logging.level.to_lowercase().as_str()) {
        warnings.push(AdvisoryWarning {
            code: "logging.level.invalid",
            path: "logging.level",
            message: format!(
                "Unknown log level '{}'. Expected one of: {}",
                cfg.logging.level,
                VALID_LEVELS.join(", ")
            ),
        });
    }

    warnings
}
