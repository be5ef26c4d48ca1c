//! Input, estimate and output types for the guarded query tool.

use adapter_tools_core::fmt::{TextFormat, TextOptions, TextStyle};
use bigquery_async::Row;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Wire arguments for `execute_safe_query`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SqlInput {
    /// The SQL query to analyze and run
    pub sql: String,
}

/// A trimmed, non-empty standard SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery(String);

impl SqlQuery {
    /// Returns `None` when `raw` is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of a dry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEstimate {
    pub estimated_bytes: u64,
}

impl CostEstimate {
    pub const fn new(estimated_bytes: u64) -> Self {
        Self { estimated_bytes }
    }
}

/// Maximum bytes a query may scan. Estimates equal to the limit are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteLimit(pub u64);

impl ByteLimit {
    /// 500 MiB.
    pub const DEFAULT: Self = Self(500 * 1024 * 1024);

    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Whether an estimate fits the budget.
    pub const fn allows(self, estimate: CostEstimate) -> bool {
        estimate.estimated_bytes <= self.0
    }

    /// Short label for descriptions: `500` for whole megabytes, `0.50` otherwise.
    pub fn mb_label(self) -> String {
        if self.0 % (1024 * 1024) == 0 {
            (self.0 / (1024 * 1024)).to_string()
        } else {
            format!("{:.2}", bytes_to_mb(self.0))
        }
    }
}

impl Default for ByteLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Convert bytes to binary megabytes (1 MB = 1048576 bytes).
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Rows returned by a query that passed the guardrail.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub total_rows: Option<u64>,
    pub estimated_bytes: u64,
}

impl TextFormat for QueryOutput {
    fn fmt_text(&self, opts: &TextOptions) -> String {
        match opts.style {
            TextStyle::Humanized => {
                let rows = Value::Array(self.rows.iter().cloned().map(Value::Object).collect());
                adapter_tools_core::fallback_text_from_json(&rows)
            }
            TextStyle::Plain => self
                .rows
                .iter()
                .map(|r| Value::Object(r.clone()).to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn sql_query_trims_and_rejects_blank() {
        assert_eq!(SqlQuery::parse("  SELECT 1 \n").unwrap().as_str(), "SELECT 1");
        assert!(SqlQuery::parse(" \t\n").is_none());
    }

    #[test]
    fn limit_boundary_is_inclusive() {
        let limit = ByteLimit::DEFAULT;
        assert_eq!(limit.bytes(), 524_288_000);
        assert!(limit.allows(CostEstimate::new(524_288_000)));
        assert!(!limit.allows(CostEstimate::new(524_288_001)));
        assert!(limit.allows(CostEstimate::new(0)));
    }

    #[test]
    fn mb_label_drops_decimals_for_whole_megabytes() {
        assert_eq!(ByteLimit::DEFAULT.mb_label(), "500");
        assert_eq!(ByteLimit(512 * 1024).mb_label(), "0.50");
    }

    #[test]
    fn megabytes_use_binary_units() {
        assert_eq!(format!("{:.2}", bytes_to_mb(524_288_001)), "500.00");
        assert_eq!(format!("{:.2}", bytes_to_mb(600 * 1024 * 1024)), "600.00");
    }

    #[test]
    fn humanized_output_is_pretty_json_array() {
        let out = QueryOutput {
            rows: vec![row(json!({"country": "NL", "visits": 12}))],
            total_rows: Some(1),
            estimated_bytes: 10,
        };
        let text = out.fmt_text(&TextOptions::default());
        assert_eq!(
            text,
            "[\n  {\n    \"country\": \"NL\",\n    \"visits\": 12\n  }\n]"
        );
    }

    #[test]
    fn plain_output_is_one_object_per_line() {
        let out = QueryOutput {
            rows: vec![row(json!({"a": 1})), row(json!({"a": 2}))],
            total_rows: None,
            estimated_bytes: 0,
        };
        let text = out.fmt_text(&TextOptions::new().with_style(TextStyle::Plain));
        assert_eq!(text, "{\"a\":1}\n{\"a\":2}");
    }

    #[test]
    fn empty_result_renders_empty_array() {
        let out = QueryOutput {
            rows: vec![],
            total_rows: Some(0),
            estimated_bytes: 0,
        };
        assert_eq!(out.fmt_text(&TextOptions::default()), "[]");
    }
}
