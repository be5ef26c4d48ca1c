//! JSONL call records for the cloud adapters.
//!
//! A [`CallLog`] appends one JSON object per tool invocation to
//! `<dir>/tool_logs_YYYY-MM-DD.jsonl`, bucketed by the UTC completion date.
//! Appends hold an exclusive `fd-lock` so two servers pointed at the same
//! directory never interleave partial lines.
//!
//! Set `ADAPTERS_LOGGING_DISABLED=1` to turn every append into a no-op.

use chrono::{DateTime, NaiveDate, Utc};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

const DISABLE_ENV: &str = "ADAPTERS_LOGGING_DISABLED";

#[derive(Error, Debug)]
pub enum LogError {
    #[error("call log I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("call record did not serialize: {0}")]
    Json(#[from] serde_json::Error),
}

/// One line of the call log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub call_id: String,
    /// Binary that served the call, e.g. `safe-bigquery-mcp`.
    pub server: String,
    /// Tool name exactly as the caller sent it, known or not.
    pub tool: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Raw arguments object.
    pub request: Value,
    /// `false` for refusals and failures as well as protocol errors.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
}

/// `true` when [`DISABLE_ENV`] holds a truthy value.
pub fn logging_disabled() -> bool {
    std::env::var(DISABLE_ENV)
        .is_ok_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

/// Identity and start time of one in-flight call.
pub struct CallTimer {
    pub call_id: String,
    pub started_at: DateTime<Utc>,
    began: Instant,
}

impl CallTimer {
    pub fn start() -> Self {
        Self {
            call_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            began: Instant::now(),
        }
    }

    /// Wall-clock completion time and whole milliseconds elapsed so far.
    pub fn finish(&self) -> (DateTime<Utc>, u64) {
        let elapsed = u64::try_from(self.began.elapsed().as_millis()).unwrap_or(u64::MAX);
        (Utc::now(), elapsed)
    }
}

/// Appends records into daily files under one directory.
#[derive(Debug, Clone)]
pub struct LogWriter {
    dir: PathBuf,
}

impl LogWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(day: NaiveDate) -> String {
        format!("tool_logs_{}.jsonl", day.format("%Y-%m-%d"))
    }

    /// File that holds records completed on the UTC day of `at`.
    pub fn jsonl_path(&self, at: DateTime<Utc>) -> PathBuf {
        self.dir.join(Self::file_name(at.date_naive()))
    }

    fn open_for_append(&self, at: DateTime<Utc>) -> Result<File, LogError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.jsonl_path(at))?)
    }

    /// Append `record` as a single line. No-op while logging is disabled.
    pub fn append_jsonl(&self, record: &ToolCallRecord) -> Result<(), LogError> {
        if logging_disabled() {
            return Ok(());
        }
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut lock = RwLock::new(self.open_for_append(record.completed_at)?);
        lock.write()?.write_all(&line)?;
        Ok(())
    }
}

/// A [`LogWriter`] bound to the name of the server producing the records.
#[derive(Debug, Clone)]
pub struct CallLog {
    writer: LogWriter,
    server: String,
}

impl CallLog {
    pub fn new(writer: LogWriter, server: impl Into<String>) -> Self {
        Self {
            writer,
            server: server.into(),
        }
    }

    /// Write the record for a finished call.
    ///
    /// A write failure is logged with `tracing::warn!` and otherwise ignored, so
    /// the call result is never affected.
    pub fn record(
        &self,
        timer: &CallTimer,
        tool: &str,
        request: Value,
        success: bool,
        error: Option<String>,
        summary: Option<Value>,
    ) {
        let (completed_at, duration_ms) = timer.finish();
        let entry = ToolCallRecord {
            call_id: timer.call_id.clone(),
            server: self.server.clone(),
            tool: tool.to_string(),
            started_at: timer.started_at,
            completed_at,
            duration_ms,
            request,
            success,
            error,
            summary,
        };

        if let Err(e) = self.writer.append_jsonl(&entry) {
            tracing::warn!(
                call_id = %entry.call_id,
                dir = %self.writer.base_dir().display(),
                "dropping call record: {e}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    struct DisabledFor;

    impl DisabledFor {
        fn set(value: &str) -> Self {
            // SAFETY: every test touching the variable runs under #[serial]
            unsafe { std::env::set_var(DISABLE_ENV, value) };
            Self
        }
    }

    impl Drop for DisabledFor {
        fn drop(&mut self) {
            // SAFETY: every test touching the variable runs under #[serial]
            unsafe { std::env::remove_var(DISABLE_ENV) };
        }
    }

    fn sample(timer: &CallTimer, tool: &str) -> ToolCallRecord {
        let (completed_at, duration_ms) = timer.finish();
        ToolCallRecord {
            call_id: timer.call_id.clone(),
            server: "unit".into(),
            tool: tool.into(),
            started_at: timer.started_at,
            completed_at,
            duration_ms,
            request: json!({"sql": "SELECT 1"}),
            success: true,
            error: None,
            summary: Some(json!({"chars": 2})),
        }
    }

    #[test]
    fn timer_ids_are_uuids_and_differ() {
        let a = CallTimer::start();
        let b = CallTimer::start();
        assert!(Uuid::parse_str(&a.call_id).is_ok());
        assert_ne!(a.call_id, b.call_id);
    }

    #[test]
    fn timer_reports_elapsed_time() {
        let timer = CallTimer::start();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let (done, ms) = timer.finish();
        assert!(ms >= 10);
        assert!(done >= timer.started_at);
    }

    #[test]
    #[serial]
    fn disable_flag_accepts_truthy_spellings() {
        for v in ["1", "true", "YES", " on "] {
            let _g = DisabledFor::set(v);
            assert!(logging_disabled(), "{v:?} should disable");
        }
        for v in ["0", "false", ""] {
            let _g = DisabledFor::set(v);
            assert!(!logging_disabled(), "{v:?} should not disable");
        }
        assert!(!logging_disabled());
    }

    #[test]
    fn files_are_bucketed_by_utc_day() {
        let writer = LogWriter::new("/var/log/adapters");
        let at = DateTime::parse_from_rfc3339("2025-03-15T23:30:00-02:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            writer.jsonl_path(at),
            PathBuf::from("/var/log/adapters/tool_logs_2025-03-16.jsonl")
        );
    }

    #[test]
    #[serial]
    fn appends_one_line_per_record() {
        let temp = tempfile::tempdir().unwrap();
        let writer = LogWriter::new(temp.path().join("nested"));

        let first = sample(&CallTimer::start(), "execute_safe_query");
        let second = sample(&CallTimer::start(), "deep_search_files");
        writer.append_jsonl(&first).unwrap();
        writer.append_jsonl(&second).unwrap();

        let raw = std::fs::read_to_string(writer.jsonl_path(second.completed_at)).unwrap();
        let tools: Vec<String> = raw
            .lines()
            .map(|l| serde_json::from_str::<ToolCallRecord>(l).unwrap().tool)
            .collect();
        assert_eq!(tools, ["execute_safe_query", "deep_search_files"]);
        assert!(raw.ends_with('\n'));
    }

    #[test]
    #[serial]
    fn call_log_stamps_server_and_failure() {
        let temp = tempfile::tempdir().unwrap();
        let log = CallLog::new(LogWriter::new(temp.path()), "safe-bigquery-mcp");

        log.record(
            &CallTimer::start(),
            "execute_safe_query",
            json!({"sql": "SELECT *"}),
            false,
            Some("Error: boom".into()),
            None,
        );

        let files: Vec<PathBuf> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let rec: ToolCallRecord =
            serde_json::from_str(std::fs::read_to_string(&files[0]).unwrap().trim()).unwrap();
        assert_eq!(rec.server, "safe-bigquery-mcp");
        assert!(!rec.success);
        assert_eq!(rec.error.as_deref(), Some("Error: boom"));
        assert!(rec.summary.is_none());
    }

    #[test]
    #[serial]
    fn disabled_logging_writes_nothing() {
        let _g = DisabledFor::set("1");
        let temp = tempfile::tempdir().unwrap();
        LogWriter::new(temp.path())
            .append_jsonl(&sample(&CallTimer::start(), "t"))
            .unwrap();

        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn absent_optionals_are_omitted_and_default_on_read() {
        let mut rec = sample(&CallTimer::start(), "t");
        rec.summary = None;
        let text = serde_json::to_string(&rec).unwrap();
        assert!(!text.contains("\"error\""));
        assert!(!text.contains("\"summary\""));

        let back: ToolCallRecord = serde_json::from_str(&text).unwrap();
        assert!(back.error.is_none());
    }
}
