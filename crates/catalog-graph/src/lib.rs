//! catalog-graph: adapter over the property graph store.
//!
//! This crate is the single mutation point for the graph. The loader talks
//! to it only through [`GraphAdapter`], implemented for Neo4j by
//! [`GraphClient`] and in process by [`InMemoryGraph`].

pub mod adapter;
pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;

pub use adapter::{GraphAdapter, Vertex, ENTITY_LABEL, ID_PROPERTY};
pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::{EdgeRecord, InMemoryGraph};
