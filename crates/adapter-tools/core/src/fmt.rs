//! Rendering tool outputs to the text that goes into a [`ToolResult`](crate::ToolResult).

use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextStyle {
    /// Indented output with explanatory banners.
    #[default]
    Humanized,
    /// Compact output, one record per line.
    Plain,
}

/// Per-server rendering choices passed to every [`TextFormat::fmt_text`] call.
#[derive(Clone, Debug, Default)]
pub struct TextOptions {
    pub style: TextStyle,
}

impl TextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

/// Output types implement this to produce the text handed back to the caller.
pub trait TextFormat {
    fn fmt_text(&self, opts: &TextOptions) -> String;
}

impl TextFormat for String {
    fn fmt_text(&self, _opts: &TextOptions) -> String {
        self.clone()
    }
}

/// Indented JSON, or compact JSON if indenting fails.
pub fn fallback_text_from_json(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}
