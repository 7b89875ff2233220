//! Read operations for the catalog graph.

use neo4rs::query;

use crate::adapter::Vertex;
use crate::client::{entity_pattern, quote_ident, type_label_expr, GraphClient, GraphError};

impl GraphClient {
    /// Look up a vertex by its `@id` property.
    pub async fn get_vertex(&self, id: &str) -> Result<Option<Vertex>, GraphError> {
        let cypher = format!(
            "MATCH {node}
             RETURN {type_label} AS label LIMIT 1",
            node = entity_pattern("n", "id"),
            type_label = type_label_expr("n"),
        );

        let q = query(&cypher).param("id", id.to_string());

        match self.query_one(q).await? {
            Some(row) => {
                let label: String = row.get("label").map_err(|e| {
                    GraphError::Serialization(format!("Failed to read vertex label: {e}"))
                })?;
                Ok(Some(Vertex {
                    id: id.to_string(),
                    label,
                }))
            }
            None => Ok(None),
        }
    }

    /// Count vertices, optionally restricted to one label.
    pub async fn count_vertices(&self, label: Option<&str>) -> Result<i64, GraphError> {
        let cypher = match label {
            Some(l) => format!("MATCH (n:{}) RETURN count(n) AS cnt", quote_ident(l)),
            None => "MATCH (n) RETURN count(n) AS cnt".to_string(),
        };

        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Count edges, optionally restricted to one relationship type.
    pub async fn count_edges(&self, label: Option<&str>) -> Result<i64, GraphError> {
        let cypher = match label {
            Some(l) => format!("MATCH ()-[r:{}]->() RETURN count(r) AS cnt", quote_ident(l)),
            None => "MATCH ()-[r]->() RETURN count(r) AS cnt".to_string(),
        };

        match self.query_one(query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }
}
