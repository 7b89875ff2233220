//! catalog-sync: Loads portal metadata records into the catalog graph.
//!
//! Fetches the term context and the record set from the portal, clears the
//! graph according to the reload mode, then loads records in two passes:
//! vertices first, then properties and edges.

pub mod config;
pub mod error;
pub mod loader;
pub mod report;

pub use error::SyncError;
pub use loader::EntityLoader;
pub use report::{Diagnostic, RunReport};
