//! Search backends.

use adapter_tools_core::{BoxFuture, ToolError};

use crate::types::{DriveMatch, DriveQuery, SearchOutcome};

/// External full-text and metadata search capability.
pub trait DriveSearchBackend: Send + Sync + 'static {
    fn search(&self, query: &DriveQuery) -> BoxFuture<'static, Result<SearchOutcome, ToolError>>;
}

/// Placeholder backend: no Drive call, always the same two matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDrive;

impl DriveSearchBackend for SimulatedDrive {
    fn search(&self, query: &DriveQuery) -> BoxFuture<'static, Result<SearchOutcome, ToolError>> {
        tracing::debug!(q = %query.q(), "simulated Drive search");
        Box::pin(async {
            Ok(SearchOutcome {
                matches: vec![
                    DriveMatch {
                        id: "123".into(),
                        name: "2025_Tax_Receipts.pdf".into(),
                        context: "Mention of Labuan office fees.".into(),
                    },
                    DriveMatch {
                        id: "456".into(),
                        name: "Client_Strategy_v2.docx".into(),
                        context: "Notes on MCP integration.".into(),
                    },
                ],
                simulated: true,
            })
        })
    }
}
