//! MCP server handler backed by ToolRegistry.

use adapter_logging::{CallLog, CallTimer};
use adapter_tools_core::{
    TextOptions, ToolCallRequest, ToolContext, ToolDescriptor, ToolRegistry, ToolResult,
};
use rmcp::model as m;
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::Instrument;

/// MCP server handler backed by a [`ToolRegistry`].
///
/// `tools/list` publishes the registry's descriptors and `tools/call` goes through
/// [`ToolRegistry::invoke`]. Tool failures come back as `isError` results; only an
/// unknown tool name is answered with a JSON-RPC `invalid_params` error.
///
/// # Example
///
/// ```ignore
/// use adapter_tools_mcp::{RegistryServer, ServiceExt, stdio};
/// use std::sync::Arc;
///
/// let server = RegistryServer::new(Arc::new(registry))
///     .with_info("safe-bigquery-manager", env!("CARGO_PKG_VERSION"));
/// let service = server.serve(stdio()).await?;
/// service.waiting().await?;
/// ```
pub struct RegistryServer {
    registry: Arc<ToolRegistry>,
    text_opts: TextOptions,
    call_log: Option<CallLog>,
    name: String,
    version: String,
}

impl RegistryServer {
    /// Create a new server from a registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            text_opts: TextOptions::default(),
            call_log: None,
            name: "cloud-adapter".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Set the server name and version.
    pub fn with_info(mut self, name: &str, version: &str) -> Self {
        self.name = name.to_string();
        self.version = version.to_string();
        self
    }

    /// Set how tool outputs are rendered to text.
    pub fn with_text_options(mut self, opts: TextOptions) -> Self {
        self.text_opts = opts;
        self
    }

    /// Record every call as a JSONL line.
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.call_log = Some(log);
        self
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The MCP tool list, sorted by name.
    pub fn tools(&self) -> Vec<m::Tool> {
        self.registry.list_tools().into_iter().map(to_mcp_tool).collect()
    }

    /// Handle one `tools/call` without a transport.
    pub async fn handle_call(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<m::CallToolResult, m::ErrorData> {
        let timer = CallTimer::start();
        let ctx = ToolContext::with_call_id(timer.call_id.clone());
        let arguments = arguments.unwrap_or_default();
        let request_json = Value::Object(arguments.clone());

        let span = tracing::info_span!("tool_call", tool = %name, call_id = %ctx.call_id());
        let request = ToolCallRequest {
            tool_name: name.to_string(),
            arguments,
        };

        let outcome = self
            .registry
            .invoke(request, &ctx, &self.text_opts)
            .instrument(span)
            .await;

        match outcome {
            Ok(result) => {
                let text = result.text();
                tracing::info!(
                    tool = %name,
                    call_id = %ctx.call_id(),
                    is_error = result.is_error,
                    chars = text.len(),
                    "tool call finished"
                );
                if let Some(log) = &self.call_log {
                    log.record(
                        &timer,
                        name,
                        request_json,
                        !result.is_error,
                        result.is_error.then(|| text.clone()),
                        Some(json!({ "chars": text.len() })),
                    );
                }
                Ok(to_call_tool_result(result))
            }
            Err(e) => {
                tracing::warn!(tool = %name, call_id = %ctx.call_id(), "{e}");
                if let Some(log) = &self.call_log {
                    log.record(&timer, name, request_json, false, Some(e.to_string()), None);
                }
                Err(m::ErrorData::invalid_params(e.to_string(), None))
            }
        }
    }
}

/// Convert a registry descriptor into an MCP tool definition.
pub fn to_mcp_tool(d: ToolDescriptor) -> m::Tool {
    m::Tool {
        name: d.name.clone().into(),
        title: d.name.into(),
        description: Some(d.description.into()),
        input_schema: Arc::new(d.input_schema),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
    }
}

/// Convert the uniform envelope into an MCP call result.
pub fn to_call_tool_result(result: ToolResult) -> m::CallToolResult {
    m::CallToolResult {
        content: result
            .content
            .into_iter()
            .map(|c| m::Content::text(c.text))
            .collect(),
        structured_content: None,
        is_error: Some(result.is_error),
        meta: None,
    }
}

// Allow manual_async_fn because the trait signature uses `impl Future` return types
#[allow(clippy::manual_async_fn)]
impl ServerHandler for RegistryServer {
    fn initialize(
        &self,
        _params: m::InitializeRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::InitializeResult, m::ErrorData>> + Send + '_
    {
        async move {
            tracing::info!(server = %self.name, version = %self.version, "MCP initialize");
            Ok(m::InitializeResult {
                server_info: m::Implementation {
                    name: self.name.clone(),
                    title: self.name.clone().into(),
                    version: self.version.clone(),
                    website_url: None,
                    icons: None,
                },
                capabilities: m::ServerCapabilities::builder().enable_tools().build(),
                ..Default::default()
            })
        }
    }

    fn list_tools(
        &self,
        _req: Option<m::PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::ListToolsResult, m::ErrorData>> + Send + '_
    {
        async move {
            Ok(m::ListToolsResult {
                tools: self.tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        req: m::CallToolRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<m::CallToolResult, m::ErrorData>> + Send + '_
    {
        async move { self.handle_call(&req.name, req.arguments).await }
    }

    fn ping(
        &self,
        _ctx: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<(), m::ErrorData>> + Send + '_ {
        async { Ok(()) }
    }
}
