//! Unified error type for adapter tools.

use thiserror::Error;

/// Error type returned by tool operations.
///
/// Only [`ToolError::UnknownTool`] is a protocol-level failure that escapes
/// [`ToolRegistry::invoke`](crate::ToolRegistry::invoke); every other variant is
/// shaped into an error [`ToolResult`](crate::ToolResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The caller named a tool that is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Required argument missing or of the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tool refused to run the request (e.g. a cost guardrail tripped).
    #[error("rejected: {0}")]
    Rejected(String),

    /// An external call (network, auth, remote validation, timeout) failed.
    #[error("external service error: {0}")]
    External(String),

    /// Internal error during tool execution.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create an unknown tool error.
    pub fn unknown_tool<S: ToString>(s: S) -> Self {
        Self::UnknownTool(s.to_string())
    }

    /// Create an invalid input error.
    pub fn invalid_input<S: ToString>(s: S) -> Self {
        Self::InvalidInput(s.to_string())
    }

    /// Create a refusal.
    pub fn rejected<S: ToString>(s: S) -> Self {
        Self::Rejected(s.to_string())
    }

    /// Create an external service error.
    pub fn external<S: ToString>(s: S) -> Self {
        Self::External(s.to_string())
    }

    /// Create an internal error.
    pub fn internal<S: ToString>(s: S) -> Self {
        Self::Internal(s.to_string())
    }

    /// The underlying message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::UnknownTool(m)
            | Self::InvalidInput(m)
            | Self::Rejected(m)
            | Self::External(m)
            | Self::Internal(m) => m,
        }
    }

    /// Whether this error is a protocol-level misuse rather than a business failure.
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::UnknownTool(_))
    }
}
