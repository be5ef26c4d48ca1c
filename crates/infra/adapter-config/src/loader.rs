//! Configuration loader with two-layer merge and env overrides.
//!
//! The loading process:
//! 1. Read global config from `~/.config/cloud-adapters/adapters.json`
//! 2. Read local config (`./adapters.json` or an explicit path)
//! 3. Deep merge at JSON Value level (RFC 7396)
//! 4. Deserialize once into typed [`AdaptersConfig`]
//! 5. Apply env var overrides (highest precedence)
//! 6. Run advisory validation

use crate::merge::merge_patch;
use crate::types::AdaptersConfig;
use crate::validation::AdvisoryWarning;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Filename for local config.
pub const LOCAL_FILE: &str = "adapters.json";

/// Directory name under config_dir for global config.
pub const GLOBAL_DIR: &str = "cloud-adapters";

/// Filename for global config.
pub const GLOBAL_FILE: &str = "adapters.json";

/// Result of loading configuration.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The loaded and merged configuration.
    pub config: AdaptersConfig,

    /// Advisory warnings from env parsing and validation.
    pub warnings: Vec<AdvisoryWarning>,

    /// Files that were found and merged, lowest precedence first.
    pub sources: Vec<PathBuf>,
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(GLOBAL_DIR).join(GLOBAL_FILE))
}

/// Load the global config plus `local_file` (default `./adapters.json`).
pub fn load_merged(local_file: Option<&Path>) -> Result<LoadedConfig> {
    let local = local_file.map_or_else(|| PathBuf::from(LOCAL_FILE), Path::to_path_buf);
    load_from_paths(global_config_path().as_deref(), &local)
}

/// Load config from explicit global and local paths.
///
/// Missing files are treated as empty objects; unreadable or malformed files are errors.
pub fn load_from_paths(global: Option<&Path>, local: &Path) -> Result<LoadedConfig> {
    let mut sources = vec![];
    let mut merged = Value::Object(serde_json::Map::new());

    for path in global.into_iter().chain(std::iter::once(local)) {
        if let Some(v) = read_json_object(path)? {
            merged = merge_patch(merged, v);
            sources.push(path.to_path_buf());
        }
    }

    let mut config: AdaptersConfig =
        serde_json::from_value(merged).context("Failed to deserialize merged adapters config")?;

    let mut warnings = apply_env_overrides(&mut config);
    warnings.extend(crate::validation::validate(&config));

    Ok(LoadedConfig {
        config,
        warnings,
        sources,
    })
}

/// Apply environment variable overrides to the config.
fn apply_env_overrides(cfg: &mut AdaptersConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];

    if let Some(v) = env_trimmed("SAFE_BIGQUERY_MAX_BYTES") {
        match v.parse::<u64>() {
            Ok(n) => cfg.bigquery.max_bytes = n,
            Err(_) => warnings.push(AdvisoryWarning {
                code: "env.max_bytes.invalid",
                path: "bigquery.max_bytes",
                message: format!("SAFE_BIGQUERY_MAX_BYTES is not a byte count: '{v}'"),
            }),
        }
    }
    if let Some(v) = env_trimmed("SAFE_BIGQUERY_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(n) => cfg.bigquery.timeout_secs = n,
            Err(_) => warnings.push(AdvisoryWarning {
                code: "env.timeout_secs.invalid",
                path: "bigquery.timeout_secs",
                message: format!("SAFE_BIGQUERY_TIMEOUT_SECS is not a number of seconds: '{v}'"),
            }),
        }
    }

    if let Some(v) = env_trimmed("ADAPTERS_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_trimmed("ADAPTERS_LOG_JSON") {
        cfg.logging.json = v.eq_ignore_ascii_case("true") || v == "1";
    }
    if let Some(v) = env_trimmed("ADAPTERS_CALL_LOG_DIR") {
        cfg.logging.call_log_dir = Some(PathBuf::from(v));
    }

    warnings
}

/// Helper to read and normalize an env var (trim + filter empty).
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_json_object(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let v: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    match v {
        Value::Object(_) => Ok(Some(v)),
        _ => anyhow::bail!("Config root must be a JSON object: {}", path.display()),
    }
}
