//! MCP stdio server exposing `execute_safe_query`.
//!
//! Every query is dry-run first; anything estimated above the configured byte
//! budget is refused without running.

use adapter_config::{AdaptersConfig, LoggingConfig, load_merged};
use adapter_logging::{CallLog, LogWriter};
use adapter_tools_mcp::{RegistryServer, ServiceExt, stdio};
use anyhow::Context;
use bigquery_async::config::Config;
use bigquery_async::{BigQueryConfig, Client};
use clap::Parser;
use safe_bigquery_tools::{BigQueryEngine, ByteLimit, QueryGuard, build_registry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "safe-bigquery-manager";

#[derive(Parser, Debug)]
#[command(name = "safe-bigquery-mcp")]
#[command(
    about = "MCP server that runs BigQuery SQL only when the dry-run estimate fits a byte budget",
    version
)]
struct Args {
    /// Local JSON config file, merged over ~/.config/cloud-adapters/adapters.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Largest dry-run estimate allowed to execute, in bytes
    #[arg(long, value_name = "BYTES")]
    max_bytes: Option<u64>,

    /// Timeout for each BigQuery call, in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Project to run (and bill) queries in; overrides BIGQUERY_PROJECT_ID
    #[arg(long, value_name = "ID")]
    project: Option<String>,

    /// List available tools and exit
    #[arg(long)]
    list_tools: bool,

    /// Emit JSON log lines on stderr
    #[arg(long)]
    log_json: bool,
}

fn apply_cli(cfg: &mut AdaptersConfig, args: &Args) {
    if let Some(n) = args.max_bytes {
        cfg.bigquery.max_bytes = n;
    }
    if let Some(n) = args.timeout_secs {
        cfg.bigquery.timeout_secs = n;
    }
    if args.log_json {
        cfg.logging.json = true;
    }
}

// stdout carries the MCP protocol, so logs go to stderr
fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install the rustls CryptoProvider before any HTTP clients are created.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    let loaded = load_merged(args.config.as_deref())?;
    let mut config = loaded.config;
    apply_cli(&mut config, &args);

    init_tracing(&config.logging);
    for source in &loaded.sources {
        tracing::debug!(source = %source.display(), "loaded config file");
    }
    for w in &loaded.warnings {
        tracing::warn!(code = w.code, path = w.path, "{}", w.message);
    }

    let mut bq = BigQueryConfig::new();
    if let Some(project) = &args.project {
        bq = bq.with_project_id(project);
    }
    if let Err(e) = bq.validate_auth() {
        tracing::warn!("{e}; queries will fail until a token is provided");
    }
    if let Err(e) = bq.project_id() {
        tracing::warn!("{e}");
    }

    let limit = ByteLimit(config.bigquery.max_bytes);
    let client = Client::with_config(bq).context("Failed to build BigQuery HTTP client")?;
    let guard = QueryGuard::new(Arc::new(BigQueryEngine::new(client)))
        .with_limit(limit)
        .with_timeout(Duration::from_secs(config.bigquery.timeout_secs));
    let registry = build_registry(guard);

    if args.list_tools {
        let tools = registry.list_tools();
        eprintln!("Available tools ({}):", tools.len());
        for t in tools {
            eprintln!("  - {}: {}", t.name, t.description);
        }
        return Ok(());
    }

    let mut server = RegistryServer::new(Arc::new(registry))
        .with_info(SERVER_NAME, env!("CARGO_PKG_VERSION"));
    if let Some(dir) = &config.logging.call_log_dir {
        server = server.with_call_log(CallLog::new(LogWriter::new(dir), "safe-bigquery-mcp"));
    }

    tracing::info!(
        limit_bytes = limit.bytes(),
        timeout_secs = config.bigquery.timeout_secs,
        "starting {SERVER_NAME}"
    );

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
