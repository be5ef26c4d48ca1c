use std::sync::Arc;

use adapter_tools_core::{BoxFuture, Tool, ToolCodec, ToolContext, ToolError, ToolRegistry};

use crate::backend::DriveSearchBackend;
use crate::types::{DeepSearchInput, DeepSearchOutput, DriveQuery};

/// Searches Drive files by content and metadata.
#[derive(Clone)]
pub struct DeepSearchFilesTool {
    backend: Arc<dyn DriveSearchBackend>,
}

impl DeepSearchFilesTool {
    pub fn new(backend: Arc<dyn DriveSearchBackend>) -> Self {
        Self { backend }
    }
}

impl Tool for DeepSearchFilesTool {
    type Input = DriveQuery;
    type Output = DeepSearchOutput;

    const NAME: &'static str = "deep_search_files";
    const DESCRIPTION: &'static str =
        "Search Google Drive for files by content and metadata, returning deep context.";

    fn call(
        &self,
        input: Self::Input,
        _ctx: &ToolContext,
    ) -> BoxFuture<'static, Result<Self::Output, ToolError>> {
        let search = self.backend.search(&input);
        Box::pin(async move {
            let outcome = search.await?;
            Ok(DeepSearchOutput {
                query: input,
                outcome,
            })
        })
    }
}

/// Decodes `{ query, mimeType? }` into a [`DriveQuery`].
pub struct DriveQueryCodec;

impl ToolCodec<DeepSearchFilesTool> for DriveQueryCodec {
    type WireIn = DeepSearchInput;

    fn decode(wire: Self::WireIn) -> Result<DriveQuery, ToolError> {
        DriveQuery::new(&wire.query, wire.mime_type.as_deref())
            .ok_or_else(|| ToolError::invalid_input("query must not be empty"))
    }
}

pub fn build_registry(backend: Arc<dyn DriveSearchBackend>) -> ToolRegistry {
    ToolRegistry::builder()
        .register::<DeepSearchFilesTool, DriveQueryCodec>(DeepSearchFilesTool::new(backend))
        .finish()
}
