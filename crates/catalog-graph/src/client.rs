//! Neo4j client: connection pool, row helpers, and the adapter error type.

use neo4rs::{query, ConfigBuilder, Graph, Query};

use crate::adapter::{ENTITY_LABEL, ID_PROPERTY};

/// Failures of the graph store. Every variant aborts a load run.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Cannot reach Neo4j: {0}")]
    Connection(String),

    #[error("Cypher execution failed: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Vertex not found: {id}")]
    NotFound { id: String },

    #[error("Unexpected row shape: {0}")]
    Serialization(String),
}

/// Neo4j endpoint and pool settings.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
    /// Vertices removed per `DETACH DELETE` round trip when clearing.
    pub delete_batch_size: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "catalog-dev".to_string(),
            max_connections: 16,
            fetch_size: 256,
            delete_batch_size: 10_000,
        }
    }
}

/// Pooled Neo4j client implementing [`crate::GraphAdapter`].
///
/// The caller owns the client for the duration of a run and drops it
/// afterwards. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    delete_batch_size: u32,
}

impl GraphClient {
    /// Open the connection pool.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let client = Self {
            graph,
            delete_batch_size: config.delete_batch_size.max(1),
        };
        client.ensure_id_index().await?;

        tracing::info!(uri = %config.uri, batch = config.delete_batch_size, "Graph store connected");
        Ok(client)
    }

    /// Declare the identifier index. A no-op when it already exists.
    async fn ensure_id_index(&self) -> Result<(), GraphError> {
        let cypher = format!(
            "CREATE INDEX entity_id IF NOT EXISTS FOR (n:{label}) ON (n.{key})",
            label = quote_ident(ENTITY_LABEL),
            key = quote_ident(ID_PROPERTY),
        );
        self.graph.run(query(&cypher)).await?;
        Ok(())
    }

    pub(crate) fn delete_batch_size(&self) -> u32 {
        self.delete_batch_size
    }

    /// Run a query and return its first row. Remaining rows are discarded.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }
}

/// Quote a label, relationship type, or property key for interpolation into Cypher.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Indexed node pattern binding `var` to the vertex whose `@id` is `$param`.
pub(crate) fn entity_pattern(var: &str, param: &str) -> String {
    format!(
        "({var}:{label} {{{key}: ${param}}})",
        label = quote_ident(ENTITY_LABEL),
        key = quote_ident(ID_PROPERTY),
    )
}

/// Cypher expression for the type label of `var`, skipping the entity label.
pub(crate) fn type_label_expr(var: &str) -> String {
    format!(
        "coalesce([l IN labels({var}) WHERE l <> '{entity}'][0], '{entity}')",
        entity = ENTITY_LABEL,
    )
}
