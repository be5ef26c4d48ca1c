//! MCP stdio server exposing `deep_search_files`.
//!
//! Searches run against the simulated backend: no Drive API call is made and the
//! results are fixed.

use adapter_config::{LoggingConfig, load_merged};
use adapter_logging::{CallLog, LogWriter};
use adapter_tools_mcp::{RegistryServer, ServiceExt, stdio};
use clap::Parser;
use drive_search_tools::{SimulatedDrive, build_registry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "gdrive-deepsearch";

#[derive(Parser, Debug)]
#[command(name = "gdrive-deepsearch-mcp")]
#[command(about = "MCP server exposing Google Drive deep search", version)]
struct Args {
    /// Local JSON config file, merged over ~/.config/cloud-adapters/adapters.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List available tools and exit
    #[arg(long)]
    list_tools: bool,

    /// Emit JSON log lines on stderr
    #[arg(long)]
    log_json: bool,
}

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
    let args = Args::parse();

    let loaded = load_merged(args.config.as_deref())?;
    let mut logging = loaded.config.logging;
    logging.json |= args.log_json;

    init_tracing(&logging);
    for w in &loaded.warnings {
        tracing::warn!(code = w.code, path = w.path, "{}", w.message);
    }

    let registry = build_registry(Arc::new(SimulatedDrive));

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
    if let Some(dir) = &logging.call_log_dir {
        server = server.with_call_log(CallLog::new(LogWriter::new(dir), "gdrive-deepsearch-mcp"));
    }

    tracing::info!("starting {SERVER_NAME} (simulated search backend)");

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "gdrive-deepsearch-mcp",
            "--config",
            "/tmp/adapters.json",
            "--log-json",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/adapters.json")));
        assert!(args.log_json);
        assert!(!args.list_tools);
    }
}
