//! In-process graph store.
//!
//! Mirrors the Neo4j adapter's semantics over hash maps. Used by the loader's
//! tests and by dry runs that should not touch a live database.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_core::PropertyValue;

use crate::adapter::{GraphAdapter, Vertex};
use crate::client::GraphError;

/// A directed, labeled edge between two vertex identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone)]
struct VertexData {
    label: String,
    properties: BTreeMap<String, PropertyValue>,
}

#[derive(Debug, Default)]
struct State {
    vertices: HashMap<String, VertexData>,
    edges: Vec<EdgeRecord>,
}

/// Property graph held in memory behind an async lock.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    state: RwLock<State>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn vertex_count(&self) -> usize {
        self.state.read().await.vertices.len()
    }

    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }

    /// Count vertices carrying `label`.
    pub async fn count_label(&self, label: &str) -> usize {
        self.state
            .read()
            .await
            .vertices
            .values()
            .filter(|v| v.label == label)
            .count()
    }

    /// The vertex stored under `id`, if any.
    pub async fn vertex(&self, id: &str) -> Option<Vertex> {
        self.state.read().await.vertices.get(id).map(|v| Vertex {
            id: id.to_string(),
            label: v.label.clone(),
        })
    }

    /// A snapshot of the properties of vertex `id`.
    pub async fn properties(&self, id: &str) -> Option<BTreeMap<String, PropertyValue>> {
        self.state
            .read()
            .await
            .vertices
            .get(id)
            .map(|v| v.properties.clone())
    }

    /// All edges, in creation order.
    pub async fn edges(&self) -> Vec<EdgeRecord> {
        self.state.read().await.edges.clone()
    }

    /// Outgoing edges of vertex `id`, in creation order.
    pub async fn edges_from(&self, id: &str) -> Vec<EdgeRecord> {
        self.state
            .read()
            .await
            .edges
            .iter()
            .filter(|e| e.from == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GraphAdapter for InMemoryGraph {
    async fn find_vertex(&self, id: &str) -> Result<Option<Vertex>, GraphError> {
        Ok(self.vertex(id).await)
    }

    async fn upsert_vertex(&self, id: &str, label: &str) -> Result<Vertex, GraphError> {
        let mut state = self.state.write().await;
        let data = state
            .vertices
            .entry(id.to_string())
            .or_insert_with(|| VertexData {
                label: label.to_string(),
                properties: BTreeMap::new(),
            });
        Ok(Vertex {
            id: id.to_string(),
            label: data.label.clone(),
        })
    }

    async fn set_property(
        &self,
        vertex: &Vertex,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        let data = state
            .vertices
            .get_mut(&vertex.id)
            .ok_or_else(|| GraphError::NotFound {
                id: vertex.id.clone(),
            })?;
        data.properties.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn add_edge(&self, from: &Vertex, to: &Vertex, label: &str) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        for end in [from, to] {
            if !state.vertices.contains_key(&end.id) {
                return Err(GraphError::NotFound { id: end.id.clone() });
            }
        }
        state.edges.push(EdgeRecord {
            from: from.id.clone(),
            to: to.id.clone(),
            label: label.to_string(),
        });
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64, GraphError> {
        let mut state = self.state.write().await;
        let removed = state.vertices.len() as u64;
        state.vertices.clear();
        state.edges.clear();
        Ok(removed)
    }

    async fn clear_except_label(&self, label: &str) -> Result<u64, GraphError> {
        let mut state = self.state.write().await;
        let before = state.vertices.len();
        state.vertices.retain(|_, v| v.label == label);
        let State { vertices, edges } = &mut *state;
        edges.retain(|e| vertices.contains_key(&e.from) && vertices.contains_key(&e.to));
        Ok((before - vertices.len()) as u64)
    }
}
