//! Write operations for the catalog graph.
//!
//! Vertices are identified by the `@id` property and matched through the
//! indexed entity label. Vertex creation uses MERGE so re-running the node
//! pass is harmless; edge creation uses CREATE and is only safe after a clear.

use neo4rs::{query, BoltType};

use catalog_core::{PropertyValue, Scalar};

use crate::adapter::Vertex;
use crate::client::{entity_pattern, quote_ident, type_label_expr, GraphClient, GraphError};

impl GraphClient {
    // ── Vertices ─────────────────────────────────────────────────

    /// Find-or-create a vertex. The label is only applied on creation.
    pub async fn merge_vertex(&self, id: &str, label: &str) -> Result<Vertex, GraphError> {
        let cypher = format!(
            "MERGE {node}
             ON CREATE SET n:{label}
             RETURN {type_label} AS label",
            node = entity_pattern("n", "id"),
            label = quote_ident(label),
            type_label = type_label_expr("n"),
        );

        let q = query(&cypher).param("id", id.to_string());

        let row = self
            .query_one(q)
            .await?
            .ok_or_else(|| GraphError::NotFound { id: id.to_string() })?;
        let stored: String = row.get("label").unwrap_or_else(|_| label.to_string());

        Ok(Vertex {
            id: id.to_string(),
            label: stored,
        })
    }

    /// Overwrite one property on a vertex.
    pub async fn write_property(
        &self,
        vertex: &Vertex,
        key: &str,
        value: &PropertyValue,
    ) -> Result<(), GraphError> {
        let cypher = format!(
            "MATCH {node}
             SET n.{key} = $value
             RETURN count(n) AS cnt",
            node = entity_pattern("n", "id"),
            key = quote_ident(key),
        );

        let q = query(&cypher)
            .param("id", vertex.id.clone())
            .param("value", property_to_bolt(value));

        self.expect_match(q, &vertex.id).await
    }

    // ── Edges ────────────────────────────────────────────────────

    /// Create a directed edge between two existing vertices.
    pub async fn create_edge(
        &self,
        from: &Vertex,
        to: &Vertex,
        label: &str,
    ) -> Result<(), GraphError> {
        let cypher = format!(
            "MATCH {from}
             MATCH {to}
             CREATE (a)-[:{rel}]->(b)
             RETURN count(*) AS cnt",
            from = entity_pattern("a", "from"),
            to = entity_pattern("b", "to"),
            rel = quote_ident(label),
        );

        let q = query(&cypher)
            .param("from", from.id.clone())
            .param("to", to.id.clone());

        self.expect_match(q, &format!("{} -> {}", from.id, to.id))
            .await
    }

    // ── Bulk deletion ────────────────────────────────────────────

    /// Delete all vertices (and their edges) in batches.
    /// Returns the count of deleted vertices.
    pub async fn delete_all(&self) -> Result<u64, GraphError> {
        self.delete_in_batches("MATCH (n)").await
    }

    /// Delete every vertex lacking `label` (and their edges) in batches.
    /// Returns the count of deleted vertices.
    pub async fn delete_except_label(&self, label: &str) -> Result<u64, GraphError> {
        let pattern = format!("MATCH (n) WHERE NOT n:{}", quote_ident(label));
        self.delete_in_batches(&pattern).await
    }

    async fn delete_in_batches(&self, pattern: &str) -> Result<u64, GraphError> {
        let cypher = format!(
            "{pattern}
             WITH n LIMIT $batch
             DETACH DELETE n
             RETURN count(n) AS cnt"
        );

        let mut total = 0u64;
        loop {
            let q = query(&cypher).param("batch", self.delete_batch_size() as i64);
            let deleted = match self.query_one(q).await? {
                Some(row) => row.get::<i64>("cnt").unwrap_or(0),
                None => 0,
            };
            if deleted <= 0 {
                break;
            }
            total += deleted as u64;
            tracing::debug!(deleted, total, "Deleted vertex batch");
        }
        Ok(total)
    }

    /// Run a query returning `cnt`; zero matched rows means a vertex was missing.
    async fn expect_match(&self, q: neo4rs::Query, id: &str) -> Result<(), GraphError> {
        let matched = match self.query_one(q).await? {
            Some(row) => row.get::<i64>("cnt").unwrap_or(0),
            None => 0,
        };
        if matched == 0 {
            return Err(GraphError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn scalar_to_bolt(value: &Scalar) -> BoltType {
    match value {
        Scalar::Boolean(b) => BoltType::from(*b),
        Scalar::Integer(i) => BoltType::from(*i),
        Scalar::Float(f) => BoltType::from(*f),
        Scalar::String(s) => BoltType::from(s.clone()),
    }
}

fn property_to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Scalar(s) => scalar_to_bolt(s),
        PropertyValue::List(items) => {
            BoltType::from(items.iter().map(scalar_to_bolt).collect::<Vec<BoltType>>())
        }
    }
}
