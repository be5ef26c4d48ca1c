use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use adapter_tools_core::{
    BoxFuture, TextOptions, ToolCallRequest, ToolContext, ToolError, ToolResult,
};
use drive_search_tools::{
    DriveMatch, DriveQuery, DriveSearchBackend, SearchOutcome, SimulatedDrive, build_registry,
};
use serde_json::{Value, json};

async fn call(backend: Arc<dyn DriveSearchBackend>, args: Value) -> ToolResult {
    build_registry(backend)
        .invoke(
            ToolCallRequest::new("deep_search_files", args),
            &ToolContext::default(),
            &TextOptions::default(),
        )
        .await
        .expect("known tool never propagates")
}

#[tokio::test]
async fn simulated_search_reports_two_matches() {
    let result = call(Arc::new(SimulatedDrive), json!({"query": "Tax"})).await;

    assert!(!result.is_error);
    let text = result.text();
    assert!(text.starts_with("Search complete for \"Tax\". Found 2 high-relevance matches."));
    assert!(text.contains("fullText contains 'Tax'"));
    assert_eq!(text.matches("Result ").count(), 2);
    assert!(text.contains("Result 1: [ID: 123] \"2025_Tax_Receipts.pdf\""));
    assert!(text.contains("Result 2: [ID: 456] \"Client_Strategy_v2.docx\""));
}

#[tokio::test]
async fn mime_type_filter_appears_in_drive_query() {
    let result = call(
        Arc::new(SimulatedDrive),
        json!({"query": "strategy", "mimeType": "application/vnd.google-apps.document"}),
    )
    .await;

    assert!(!result.is_error);
    assert!(
        result
            .text()
            .contains("mimeType = 'application/vnd.google-apps.document'")
    );
}

#[tokio::test]
async fn blank_or_missing_query_is_invalid_arguments() {
    let result = call(Arc::new(SimulatedDrive), json!({"query": "  "})).await;
    assert!(result.is_error);
    assert_eq!(result.text(), "Error: Invalid arguments: query must not be empty");

    let result = call(Arc::new(SimulatedDrive), json!({"mimeType": "application/pdf"})).await;
    assert!(result.is_error);
    assert!(result.text().contains("query"));
}

/// Backend recording the query it was given.
#[derive(Default)]
struct RecordingBackend {
    calls: AtomicUsize,
    fail: bool,
}

impl DriveSearchBackend for RecordingBackend {
    fn search(&self, query: &DriveQuery) -> BoxFuture<'static, Result<SearchOutcome, ToolError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail;
        let name = format!("{}.pdf", query.query);
        Box::pin(async move {
            if fail {
                return Err(ToolError::external("Drive API quota exceeded"));
            }
            Ok(SearchOutcome {
                matches: vec![DriveMatch {
                    id: "abc".into(),
                    name,
                    context: "real hit".into(),
                }],
                simulated: false,
            })
        })
    }
}

#[tokio::test]
async fn real_backend_results_have_no_simulation_banner() {
    let backend = Arc::new(RecordingBackend::default());
    let result = call(Arc::clone(&backend) as Arc<dyn DriveSearchBackend>, json!({"query": "invoice"})).await;

    assert!(!result.is_error);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    let text = result.text();
    assert!(text.contains("Found 1 high-relevance matches."));
    assert!(!text.contains("SIMULATED"));
    assert!(text.contains("[ID: abc] \"invoice.pdf\""));
}

#[tokio::test]
async fn backend_failure_is_wrapped() {
    let backend = Arc::new(RecordingBackend {
        fail: true,
        ..RecordingBackend::default()
    });
    let result = call(backend, json!({"query": "invoice"})).await;

    assert!(result.is_error);
    assert_eq!(result.text(), "Error: Drive API quota exceeded");
}

#[tokio::test]
async fn unknown_tool_propagates() {
    let err = build_registry(Arc::new(SimulatedDrive))
        .invoke(
            ToolCallRequest::new("search_everything", json!({"query": "Tax"})),
            &ToolContext::default(),
            &TextOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "search_everything"));
}

#[test]
fn discovery_lists_one_stable_descriptor() {
    let registry = build_registry(Arc::new(SimulatedDrive));
    let tools = registry.list_tools();

    assert_eq!(tools, registry.list_tools());
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "deep_search_files");
    assert_eq!(tools[0].input_schema["required"], json!(["query"]));
    assert!(tools[0].input_schema["properties"].get("mimeType").is_some());
}
