//! MCP server integration for the cloud adapter tool family.
//!
//! This crate provides [`RegistryServer`], an rmcp-backed server handler
//! that serves a [`ToolRegistry`](adapter_tools_core::ToolRegistry) over MCP.

mod server;

pub use server::{RegistryServer, to_call_tool_result, to_mcp_tool};

// Re-export rmcp types for convenience
pub use rmcp::transport::stdio;
pub use rmcp::{ServerHandler, service::ServiceExt};
