//! Tool execution context.

use uuid::Uuid;

/// Context passed to tool executions.
///
/// Each invocation gets a fresh context; nothing in it is shared across calls.
#[derive(Clone, Debug)]
pub struct ToolContext {
    call_id: String,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolContext {
    /// Create a context with a fresh call ID.
    pub fn new() -> Self {
        Self {
            call_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a context reusing an existing call ID, so log records and spans agree.
    pub fn with_call_id(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
        }
    }

    /// Unique identifier for this invocation.
    pub fn call_id(&self) -> &str {
        &self.call_id
    }
}
