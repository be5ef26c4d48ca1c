use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST projects/{project}/queries`
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Standard SQL text
    pub query: String,
    /// Always `false`; legacy SQL is not supported
    pub use_legacy_sql: bool,
    /// Validate and estimate without running the query
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    /// How long the server waits for completion before answering with `jobComplete: false`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Job location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl QueryRequest {
    /// Creates a standard-SQL request
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Marks the request as a dry run
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Sets the server-side wait
    #[must_use]
    pub const fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Sets the job location
    #[must_use]
    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = location.map(str::to_string);
        self
    }
}

/// Response shared by `jobs.query` and `jobs.getQueryResults`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Job created for the query (absent for dry runs on some endpoints)
    #[serde(default)]
    pub job_reference: Option<JobReference>,
    /// Whether results are available yet
    #[serde(default)]
    pub job_complete: Option<bool>,
    /// Bytes the query scans (int64 encoded as a string)
    #[serde(default)]
    pub total_bytes_processed: Option<String>,
    /// Result schema
    #[serde(default)]
    pub schema: Option<TableSchema>,
    /// Rows on this page
    #[serde(default)]
    pub rows: Vec<TableRow>,
    /// Token for the next page
    #[serde(default)]
    pub page_token: Option<String>,
    /// Total rows across all pages (int64 encoded as a string)
    #[serde(default)]
    pub total_rows: Option<String>,
}

/// Identifies a query job
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    /// Project the job runs in
    pub project_id: String,
    /// Job identifier
    pub job_id: String,
    /// Job location
    #[serde(default)]
    pub location: Option<String>,
}

/// Result schema
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TableSchema {
    /// Top-level columns
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

/// One column of a result schema
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TableFieldSchema {
    /// Column name
    pub name: String,
    /// BigQuery type name (`INTEGER`, `RECORD`, ...)
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// `NULLABLE`, `REQUIRED` or `REPEATED`
    #[serde(default)]
    pub mode: Option<String>,
    /// Nested columns for `RECORD` fields
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}

impl TableFieldSchema {
    /// Whether the column holds an array
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.mode
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("REPEATED"))
    }
}

/// Row payload: `{"f": [{"v": ...}, ...]}`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TableRow {
    /// Cells in schema order
    #[serde(default)]
    pub f: Vec<TableCell>,
}

/// Single cell payload
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TableCell {
    /// Raw cell value; scalars arrive as strings
    #[serde(default)]
    pub v: Value,
}
