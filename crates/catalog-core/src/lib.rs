//! catalog-core: Shared types for the catalog graph loader.
//!
//! This crate provides the foundational types used across all loader components:
//! - Records ingested from the portal API, with field values classified once
//! - Term context describing which fields reference other entities
//! - Scalar and property values written to the graph
//! - Reload modes and run lifecycle states
//! - Common error types

pub mod error;
pub mod record;
pub mod terms;
pub mod types;

pub use error::RecordError;
pub use record::{Embedded, FieldItem, FieldValue, ItemRef, Location, Record};
pub use terms::{TermContext, TermKind};
pub use types::{PropertyValue, ReloadMode, RunState, Scalar};
