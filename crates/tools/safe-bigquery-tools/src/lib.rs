//! Cost-guarded BigQuery execution for agent hosts.
//!
//! Every query is first submitted as a dry run. When the estimated scan is larger
//! than the configured [`ByteLimit`] the query is refused without running; otherwise
//! it is executed and the rows are returned as JSON text.
//!
//! The query engine is injected through [`QueryEngine`], so tests (and alternate
//! backends) never touch process-wide client state.

pub mod engine;
pub mod guard;
pub mod tools;
pub mod types;

pub use engine::{BigQueryEngine, QueryEngine};
pub use guard::{DEFAULT_TIMEOUT, QueryGuard};
pub use tools::{ExecuteSafeQueryTool, SqlCodec, build_registry};
pub use types::{ByteLimit, CostEstimate, QueryOutput, SqlInput, SqlQuery};
