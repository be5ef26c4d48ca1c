//! Core traits and types for the cloud adapter tool family.
//!
//! This crate provides:
//! - [`Tool`] trait: Native-first tool definition with no serde bounds
//! - [`ToolCodec`] trait: Typed decoding of wire arguments at the dispatch boundary
//! - [`ToolRegistry`]: Tool discovery and invocation (`list_tools` / `invoke`)
//! - [`ToolResult`]: The uniform text envelope returned for every invocation
//! - [`TextFormat`] trait: Transport-agnostic text formatting for tool outputs

pub mod context;
pub mod envelope;
pub mod error;
pub mod fmt;
pub mod registry;
pub mod schema;
pub mod tool;

pub use context::ToolContext;
pub use envelope::{TextContent, ToolCallRequest, ToolResult};
pub use error::ToolError;
pub use fmt::{TextFormat, TextOptions, TextStyle, fallback_text_from_json};
pub use registry::{ToolDescriptor, ToolRegistry, ToolRegistryBuilder};
pub use tool::{Tool, ToolCodec};

// Re-export BoxFuture so tool crates can name the call signature without depending on futures
pub use futures::future::BoxFuture;
