//! The query-cost guardrail.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use adapter_tools_core::{TextFormat, TextOptions, ToolError, ToolResult};

use crate::engine::QueryEngine;
use crate::types::{ByteLimit, CostEstimate, QueryOutput, bytes_to_mb};

/// Bound on each engine call (estimate and execute are timed separately).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Estimates a query, refuses it when over budget, and otherwise runs it.
///
/// Holds no per-call state; clones share the engine.
#[derive(Clone)]
pub struct QueryGuard {
    engine: Arc<dyn QueryEngine>,
    limit: ByteLimit,
    timeout: Duration,
}

impl QueryGuard {
    pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            engine,
            limit: ByteLimit::DEFAULT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: ByteLimit) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured byte budget.
    pub const fn limit(&self) -> ByteLimit {
        self.limit
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `sql` if its dry-run estimate is within `limit`.
    ///
    /// The execution capability is never called when the estimate fails or exceeds
    /// the limit. An estimate exactly equal to the limit is allowed.
    pub async fn execute(&self, sql: &str, limit: ByteLimit) -> Result<QueryOutput, ToolError> {
        let estimate: CostEstimate = self.bounded("dry run", self.engine.estimate(sql)).await?;

        if !limit.allows(estimate) {
            tracing::info!(
                estimated_bytes = estimate.estimated_bytes,
                limit_bytes = limit.bytes(),
                "query rejected by byte limit"
            );
            return Err(ToolError::rejected(rejection_message(estimate, limit)));
        }

        tracing::debug!(
            estimated_bytes = estimate.estimated_bytes,
            limit_bytes = limit.bytes(),
            "query within byte limit; executing"
        );

        let rows = self.bounded("query", self.engine.execute(sql)).await?;

        Ok(QueryOutput {
            rows: rows.rows,
            total_rows: rows.total_rows,
            estimated_bytes: estimate.estimated_bytes,
        })
    }

    /// [`execute`](Self::execute) shaped into the uniform envelope.
    ///
    /// Never fails: refusals and engine errors come back with `is_error` set.
    pub async fn run_guarded(&self, sql: &str, limit: ByteLimit) -> ToolResult {
        let outcome = self
            .execute(sql, limit)
            .await
            .map(|out| out.fmt_text(&TextOptions::default()));
        ToolResult::from_outcome(outcome)
    }

    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, ToolError>>,
    ) -> Result<T, ToolError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                ToolError::external(format!(
                    "BigQuery {what} timed out after {:?}",
                    self.timeout
                ))
            })?
    }
}

fn rejection_message(estimate: CostEstimate, limit: ByteLimit) -> String {
    format!(
        "🚨 QUERY REJECTED: processes {:.2}MB. Limit is {:.2}MB. \
         Add a LIMIT clause or filter your data (fewer columns, partition filters) and try again.",
        bytes_to_mb(estimate.estimated_bytes),
        bytes_to_mb(limit.bytes()),
    )
}
