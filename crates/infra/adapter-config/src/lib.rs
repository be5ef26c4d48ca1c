//! Layered configuration for the cloud adapters.
//!
//! # Configuration Precedence (lowest to highest)
//! 1. Default values
//! 2. Global config (`~/.config/cloud-adapters/adapters.json`)
//! 3. Local config (`./adapters.json`, or the path passed to [`load_merged`])
//! 4. Environment variables
//!
//! Command-line flags on the binaries are applied on top of the loaded value.
//!
//! # Environment Variables
//! - `SAFE_BIGQUERY_MAX_BYTES`: Dry-run byte budget per query
//! - `SAFE_BIGQUERY_TIMEOUT_SECS`: Timeout for each BigQuery call
//! - `ADAPTERS_LOG_LEVEL`: Override log level
//! - `ADAPTERS_LOG_JSON`: Enable JSON logging ("true" or "1")
//! - `ADAPTERS_CALL_LOG_DIR`: Directory for JSONL tool-call records

pub mod loader;
pub mod merge;
pub mod types;
pub mod validation;

pub use loader::{LoadedConfig, load_from_paths, load_merged};
pub use types::{AdaptersConfig, BigQuerySettings, DEFAULT_MAX_BYTES, LoggingConfig};
pub use validation::AdvisoryWarning;
