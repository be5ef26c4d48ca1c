//! Tool trait implementation and registry builder.

use adapter_tools_core::{BoxFuture, Tool, ToolCodec, ToolContext, ToolError, ToolRegistry};

use crate::guard::QueryGuard;
use crate::types::{QueryOutput, SqlInput, SqlQuery};

/// Runs a SQL query behind the byte-limit guardrail.
#[derive(Clone)]
pub struct ExecuteSafeQueryTool {
    guard: QueryGuard,
}

impl ExecuteSafeQueryTool {
    pub const fn new(guard: QueryGuard) -> Self {
        Self { guard }
    }

    /// Discovery description naming the configured limit.
    pub fn description(&self) -> String {
        format!(
            "Executes a BigQuery SQL query but ONLY if it processes less than {}MB of data.",
            self.guard.limit().mb_label()
        )
    }
}

impl Tool for ExecuteSafeQueryTool {
    type Input = SqlQuery;
    type Output = QueryOutput;

    const NAME: &'static str = "execute_safe_query";
    const DESCRIPTION: &'static str =
        "Executes a BigQuery SQL query but ONLY if it processes less than 500MB of data.";

    fn call(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let guard = self.guard.clone();
        let call_id = ctx.call_id().to_string();
        Box::pin(async move {
            tracing::debug!(%call_id, "execute_safe_query");
            let out = guard.execute(input.as_str(), guard.limit()).await?;
            tracing::info!(
                %call_id,
                rows = out.rows.len(),
                total_rows = ?out.total_rows,
                estimated_bytes = out.estimated_bytes,
                "query executed"
            );
            Ok(out)
        })
    }
}

/// Decodes `{ "sql": string }` into a non-blank [`SqlQuery`].
pub struct SqlCodec;

impl ToolCodec<ExecuteSafeQueryTool> for SqlCodec {
    type WireIn = SqlInput;

    fn decode(wire: Self::WireIn) -> Result<SqlQuery, ToolError> {
        SqlQuery::parse(&wire.sql).ok_or_else(|| ToolError::invalid_input("sql must not be empty"))
    }
}

/// Build a `ToolRegistry` holding the single guarded query tool.
pub fn build_registry(guard: QueryGuard) -> ToolRegistry {
    let tool = ExecuteSafeQueryTool::new(guard);
    let description = tool.description();
    ToolRegistry::builder()
        .register_described::<ExecuteSafeQueryTool, SqlCodec>(tool, description)
        .finish()
}
