//! Google Drive deep search exposed as a single agent tool.
//!
//! The tool decodes `{ query, mimeType? }` into a [`DriveQuery`], hands it to a
//! [`DriveSearchBackend`], and renders the matches as text. The shipped backend,
//! [`SimulatedDrive`], makes no network calls and returns two fixed matches.

pub mod backend;
pub mod tools;
pub mod types;

pub use backend::{DriveSearchBackend, SimulatedDrive};
pub use tools::{DeepSearchFilesTool, DriveQueryCodec, build_registry};
pub use types::{DeepSearchInput, DeepSearchOutput, DriveMatch, DriveQuery, SearchOutcome};
