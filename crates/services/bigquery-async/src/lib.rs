#![deny(missing_docs)]

//! Async BigQuery REST v2 client covering what a cost-guarded query tool needs:
//! dry-run byte estimates, query execution, job polling and result pagination.

/// HTTP client implementation
pub mod client;
/// Configuration types for the client
pub mod config;
/// Error types
pub mod error;
/// Decoding of BigQuery row payloads into JSON objects
pub mod rows;
/// Test support utilities (for use in tests)
#[doc(hidden)]
pub mod test_support;
/// Request and response types
pub mod types;

pub use crate::client::Client;
pub use crate::config::BigQueryConfig;
pub use crate::error::{ApiErrorObject, BigQueryError};
pub use crate::rows::{QueryRows, Row};
