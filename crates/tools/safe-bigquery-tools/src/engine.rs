//! Query engine seam: dry-run estimation and real execution.

use std::sync::Arc;

use adapter_tools_core::{BoxFuture, ToolError};
use bigquery_async::config::Config;
use bigquery_async::{BigQueryConfig, Client, QueryRows};

use crate::types::CostEstimate;

/// External query capability consumed by [`QueryGuard`](crate::QueryGuard).
///
/// `estimate` must not scan data or incur cost. `execute` runs the query for real
/// and is only called after the guardrail passes.
pub trait QueryEngine: Send + Sync + 'static {
    fn estimate(&self, sql: &str) -> BoxFuture<'static, Result<CostEstimate, ToolError>>;

    fn execute(&self, sql: &str) -> BoxFuture<'static, Result<QueryRows, ToolError>>;
}

/// [`QueryEngine`] backed by the BigQuery REST API.
pub struct BigQueryEngine<C: Config = BigQueryConfig> {
    client: Arc<Client<C>>,
}

impl<C: Config> Clone for BigQueryEngine<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: Config + 'static> BigQueryEngine<C> {
    pub fn new(client: Client<C>) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl<C: Config + 'static> QueryEngine for BigQueryEngine<C> {
    fn estimate(&self, sql: &str) -> BoxFuture<'static, Result<CostEstimate, ToolError>> {
        let client = Arc::clone(&self.client);
        let sql = sql.to_string();
        Box::pin(async move {
            let bytes = client.dry_run(&sql).await.map_err(ToolError::external)?;
            Ok(CostEstimate::new(bytes))
        })
    }

    fn execute(&self, sql: &str) -> BoxFuture<'static, Result<QueryRows, ToolError>> {
        let client = Arc::clone(&self.client);
        let sql = sql.to_string();
        Box::pin(async move { client.query(&sql).await.map_err(ToolError::external) })
    }
}
