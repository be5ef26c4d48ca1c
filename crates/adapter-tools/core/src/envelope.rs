//! Request and result envelopes shared by every adapter.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single call naming a tool and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRequest {
    /// Name of the tool to call.
    pub tool_name: String,
    /// Named arguments, decoded by the tool's codec.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    /// Build a request from a tool name and a JSON value.
    ///
    /// Non-object values are treated as an empty argument map; the tool's codec
    /// then reports whichever required fields are missing.
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// One text block of a [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "text")]
pub struct TextContent {
    pub text: String,
}

/// The uniform envelope returned for every tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result carrying rendered output.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent { text: text.into() }],
            is_error: false,
        }
    }

    /// Error result carrying a message exactly as given.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent { text: text.into() }],
            is_error: true,
        }
    }

    /// Shape a caught error into an error result.
    ///
    /// Refusals keep their message verbatim; everything else is reported as
    /// `Error: <message>`.
    pub fn from_error(err: &ToolError) -> Self {
        match err {
            ToolError::Rejected(msg) => Self::error(msg.clone()),
            ToolError::InvalidInput(msg) => Self::error(format!("Error: Invalid arguments: {msg}")),
            other => Self::error(format!("Error: {}", other.message())),
        }
    }

    /// Shape any outcome of a tool call into an envelope.
    pub fn from_outcome(outcome: Result<String, ToolError>) -> Self {
        match outcome {
            Ok(text) => Self::success(text),
            Err(e) => Self::from_error(&e),
        }
    }

    /// Concatenated text of all content blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
