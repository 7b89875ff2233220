//! Configuration for the catalog graph loader.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`CATALOG__SECTION__KEY`, e.g. `CATALOG__PORTAL__API_KEY`)
//! 2. Config file (`catalog.toml`, prefix selectable)
//! 3. Defaults

use serde::Deserialize;

use catalog_graph::GraphConfig;
use catalog_portal::{Credentials, PortalConfig};

use crate::error::{Result, SyncError};

/// Top-level loader configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub neo4j: Neo4jSection,

    #[serde(default)]
    pub portal: PortalSection,

    #[serde(default)]
    pub loader: LoaderConfig,
}

/// `[neo4j]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSection {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Vertices deleted per round trip while clearing.
    #[serde(default = "default_delete_batch_size")]
    pub delete_batch_size: u32,
}

/// `[portal]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_records_path")]
    pub records_path: String,

    #[serde(default = "default_terms_path")]
    pub terms_path: String,

    /// API key; sent together with `api_secret` as basic auth.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub api_secret: Option<String>,

    /// Fetch records in pages of this size instead of a single `limit=all` request.
    #[serde(default)]
    pub page_size: Option<usize>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// `[loader]` section: how records map onto the graph.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoaderConfig {
    /// Label preserved by quick reloads and excluded from quick fetches.
    #[serde(default = "default_stable_label")]
    pub stable_label: String,

    /// Link-shaped fields that are always stored as literal properties.
    #[serde(default = "default_literal_fields")]
    pub literal_fields: Vec<String>,

    /// Bookkeeping fields never loaded.
    #[serde(default = "default_skip_fields")]
    pub skip_fields: Vec<String>,
}

impl SyncConfig {
    /// Load from `<file_prefix>.toml` (optional) layered under `CATALOG__` env vars.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CATALOG")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("loader.literal_fields")
                    .with_list_parse_key("loader.skip_fields"),
            )
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?;

        cfg.try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            uri: self.neo4j.uri.clone(),
            user: self.neo4j.user.clone(),
            password: self.neo4j.password.clone(),
            max_connections: self.neo4j.max_connections,
            fetch_size: self.neo4j.fetch_size,
            delete_batch_size: self.neo4j.delete_batch_size,
        }
    }

    pub fn portal_config(&self) -> PortalConfig {
        let credentials = match (&self.portal.api_key, &self.portal.api_secret) {
            (Some(key), Some(secret)) => Some(Credentials {
                key: key.clone(),
                secret: secret.clone(),
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("Only one of portal.api_key / portal.api_secret is set; fetching anonymously");
                None
            }
            (None, None) => None,
        };

        PortalConfig {
            base_url: self.portal.base_url.clone(),
            records_path: self.portal.records_path.clone(),
            terms_path: self.portal.terms_path.clone(),
            stable_type: self.loader.stable_label.clone(),
            page_size: self.portal.page_size,
            timeout_secs: self.portal.timeout_secs,
            credentials,
        }
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "catalog-dev".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_delete_batch_size() -> u32 {
    10_000
}

fn default_base_url() -> String {
    catalog_portal::client::DEFAULT_BASE_URL.to_string()
}

fn default_records_path() -> String {
    "/search/".to_string()
}

fn default_terms_path() -> String {
    "/terms/".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_stable_label() -> String {
    "Gene".to_string()
}

fn default_literal_fields() -> Vec<String> {
    [
        "term_id",
        "dbxrefs",
        "treatment_term_id",
        "url",
        "downloaded_url",
        "source_url",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_skip_fields() -> Vec<String> {
    vec!["audit".to_string()]
}

impl Default for Neo4jSection {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            delete_batch_size: default_delete_batch_size(),
        }
    }
}

impl Default for PortalSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            records_path: default_records_path(),
            terms_path: default_terms_path(),
            api_key: None,
            api_secret: None,
            page_size: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            stable_label: default_stable_label(),
            literal_fields: default_literal_fields(),
            skip_fields: default_skip_fields(),
        }
    }
}
