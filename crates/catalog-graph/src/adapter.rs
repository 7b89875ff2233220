//! The graph adapter: the only operations the loader performs on the store.

use async_trait::async_trait;
use catalog_core::PropertyValue;

use crate::client::GraphError;

/// Vertex property holding the record identifier.
pub const ID_PROPERTY: &str = "@id";

/// Label carried by every vertex next to its type label. The identifier
/// index is declared on it, so lookups by `@id` never scan the whole store.
pub const ENTITY_LABEL: &str = "Entity";

/// Handle to a vertex in the graph, keyed by record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vertex {
    pub id: String,
    pub label: String,
}

/// Idempotent CRUD primitives over a property graph.
///
/// Implementations must guarantee at most one vertex per identifier as long
/// as callers do not race on the same identifier.
#[async_trait]
pub trait GraphAdapter: Send + Sync {
    /// Look up a vertex by exact identifier.
    async fn find_vertex(&self, id: &str) -> Result<Option<Vertex>, GraphError>;

    /// Return the existing vertex for `id`, or create one with `label`.
    /// An existing vertex keeps its original label.
    async fn upsert_vertex(&self, id: &str, label: &str) -> Result<Vertex, GraphError>;

    /// Overwrite a property. Last write wins.
    async fn set_property(
        &self,
        vertex: &Vertex,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError>;

    /// Create a new edge. Not idempotent: repeated calls create parallel edges.
    async fn add_edge(&self, from: &Vertex, to: &Vertex, label: &str) -> Result<(), GraphError>;

    /// Delete every vertex and edge. Returns the number of vertices removed.
    async fn clear_all(&self) -> Result<u64, GraphError>;

    /// Delete every vertex not labeled `label`, with their edges.
    /// Returns the number of vertices removed.
    async fn clear_except_label(&self, label: &str) -> Result<u64, GraphError>;
}

#[async_trait]
impl GraphAdapter for crate::client::GraphClient {
    async fn find_vertex(&self, id: &str) -> Result<Option<Vertex>, GraphError> {
        self.get_vertex(id).await
    }

    async fn upsert_vertex(&self, id: &str, label: &str) -> Result<Vertex, GraphError> {
        self.merge_vertex(id, label).await
    }

    async fn set_property(
        &self,
        vertex: &Vertex,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError> {
        self.write_property(vertex, key, value).await
    }

    async fn add_edge(&self, from: &Vertex, to: &Vertex, label: &str) -> Result<(), GraphError> {
        self.create_edge(from, to, label).await
    }

    async fn clear_all(&self) -> Result<u64, GraphError> {
        self.delete_all().await
    }

    async fn clear_except_label(&self, label: &str) -> Result<u64, GraphError> {
        self.delete_except_label(label).await
    }
}
