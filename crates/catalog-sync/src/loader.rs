//! Entity loader: turns the portal record set into vertices, properties and edges.
//!
//! A run is `Fetching -> Clearing -> NodePass -> PropertyPass -> Done`.
//! The node pass creates a vertex for every record before any edge is
//! attempted, so references resolve regardless of record order. The property
//! pass is not idempotent (edges are created unconditionally), so a failed
//! run must be retried from the clear step, never resumed.

use std::future::Future;
use std::pin::Pin;

use catalog_core::record::ATTACHMENT_FIELD;
use catalog_core::{
    Embedded, ItemRef, PropertyValue, Record, ReloadMode, RunState, Scalar, TermContext,
};
use catalog_graph::{GraphAdapter, Vertex};
use catalog_portal::{RecordSource, TermCatalog};

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::report::{Diagnostic, RunReport};

type LoadFuture<'b> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'b>>;

/// Orchestrates one load run against an explicit graph handle.
///
/// The caller owns the graph handle and the portal clients; the loader only
/// borrows them for the duration of [`EntityLoader::run`].
pub struct EntityLoader<'a> {
    graph: &'a dyn GraphAdapter,
    terms: &'a dyn TermCatalog,
    records: &'a dyn RecordSource,
    config: LoaderConfig,
}

impl<'a> EntityLoader<'a> {
    pub fn new(
        graph: &'a dyn GraphAdapter,
        terms: &'a dyn TermCatalog,
        records: &'a dyn RecordSource,
    ) -> Self {
        Self {
            graph,
            terms,
            records,
            config: LoaderConfig::default(),
        }
    }

    /// Set a custom loader configuration.
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute a complete load in the given mode.
    ///
    /// Any fetch or adapter error aborts the run and is returned unchanged.
    pub async fn run(&self, mode: ReloadMode) -> Result<RunReport> {
        let (report, outcome) = self.run_with_report(mode).await;
        outcome.map(|()| report)
    }

    /// Execute a complete load and return its report whatever the outcome.
    ///
    /// On failure the report is in the `Failed` state and keeps the counters
    /// and diagnostics gathered before the error.
    pub async fn run_with_report(&self, mode: ReloadMode) -> (RunReport, Result<()>) {
        let mut report = RunReport::new(mode);
        tracing::info!(run_id = %report.run_id, mode = %mode, "Starting load run");

        let outcome = self.execute(mode, &mut report).await;
        match &outcome {
            Ok(()) => {
                report.transition(RunState::Done);
                tracing::info!(
                    run_id = %report.run_id,
                    records = report.records,
                    cleared = report.vertices_cleared,
                    vertices = report.vertices_upserted,
                    properties = report.properties_set,
                    edges = report.edges_created,
                    unresolved_links = report.unresolved_links(),
                    duration_ms = report.duration_ms().unwrap_or_default(),
                    "Load run complete"
                );
            }
            Err(e) => {
                let failed_in = report.state;
                report.transition(RunState::Failed);
                tracing::error!(
                    run_id = %report.run_id,
                    state = ?failed_in,
                    error = %e,
                    vertices = report.vertices_upserted,
                    properties = report.properties_set,
                    edges = report.edges_created,
                    diagnostics = report.diagnostics.len(),
                    "Load run failed"
                );
            }
        }
        (report, outcome)
    }

    async fn execute(&self, mode: ReloadMode, report: &mut RunReport) -> Result<()> {
        // The record set must be complete before anything is cleared.
        let (terms, records) = tokio::try_join!(
            self.terms.fetch_context(),
            self.records.fetch_records(mode)
        )?;
        report.records = records.len();

        report.transition(RunState::Clearing);
        report.vertices_cleared = match mode {
            ReloadMode::Full => self.graph.clear_all().await?,
            ReloadMode::Quick => self.graph.clear_except_label(&self.config.stable_label).await?,
        };

        report.transition(RunState::NodePass);
        let mut vertices = Vec::with_capacity(records.len());
        for record in &records {
            vertices.push(self.graph.upsert_vertex(&record.id, record.primary_type()).await?);
            report.vertices_upserted += 1;
        }

        report.transition(RunState::PropertyPass);
        for (record, vertex) in records.iter().zip(&vertices) {
            self.populate(record, vertex, &terms, report).await?;
        }

        Ok(())
    }

    /// Whether values of `field` should become edges.
    fn is_link(&self, field: &str, terms: &TermContext) -> bool {
        if self.config.literal_fields.iter().any(|f| f == field) {
            return false;
        }
        terms.is_link(field)
    }

    /// Write the properties and edges of one record onto its vertex.
    ///
    /// Boxed because attachments recurse into their own records.
    fn populate<'b>(
        &'b self,
        record: &'b Record,
        vertex: &'b Vertex,
        terms: &'b TermContext,
        report: &'b mut RunReport,
    ) -> LoadFuture<'b> {
        Box::pin(async move {
            for (field, value) in &record.fields {
                if self.config.skip_fields.iter().any(|f| f == field) {
                    continue;
                }

                let link = self.is_link(field, terms);
                let mut literals: Vec<Scalar> = Vec::new();

                for item in value.items() {
                    match item {
                        ItemRef::Scalar(Scalar::String(target)) if link => {
                            match self.graph.find_vertex(target).await? {
                                Some(to) => {
                                    self.graph.add_edge(vertex, &to, field).await?;
                                    report.edges_created += 1;
                                }
                                None => {
                                    tracing::warn!(
                                        record = %record.id,
                                        field = %field,
                                        value = %target,
                                        "No vertex for link target, storing as property"
                                    );
                                    report.diagnostics.push(Diagnostic::UnresolvedLink {
                                        record: record.id.clone(),
                                        field: field.clone(),
                                        value: target.clone(),
                                    });
                                    literals.push(Scalar::String(target.clone()));
                                }
                            }
                        }
                        ItemRef::Scalar(scalar) => literals.push(scalar.clone()),
                        ItemRef::Embedded(embedded) => {
                            self.load_embedded(record, vertex, field, embedded, terms, report)
                                .await?;
                        }
                    }
                }

                if let Some(value) = PropertyValue::from_scalars(literals) {
                    self.graph.set_property(vertex, field, &value).await?;
                    report.properties_set += 1;
                }
            }
            Ok(())
        })
    }

    /// Dispatch one embedded object found under `field` of `record`.
    async fn load_embedded(
        &self,
        record: &Record,
        vertex: &Vertex,
        field: &str,
        embedded: &Embedded,
        terms: &TermContext,
        report: &mut RunReport,
    ) -> Result<()> {
        match embedded {
            Embedded::Attachment(attachment) => {
                tracing::debug!(record = %record.id, attachment = %attachment.id, "Loading attachment");
                let child = self
                    .graph
                    .upsert_vertex(&attachment.id, attachment.primary_type())
                    .await?;
                report.vertices_upserted += 1;

                self.graph.add_edge(vertex, &child, ATTACHMENT_FIELD).await?;
                report.edges_created += 1;

                self.populate(attachment, &child, terms, report).await?;
            }
            Embedded::Location(location) => {
                for (key, value) in location.properties() {
                    self.graph
                        .set_property(vertex, &key, &PropertyValue::Scalar(value))
                        .await?;
                    report.properties_set += 1;
                }
            }
            Embedded::Layout => {
                tracing::debug!(record = %record.id, "Skipping page layout");
                report.diagnostics.push(Diagnostic::LayoutSkipped {
                    record: record.id.clone(),
                });
            }
            Embedded::Unsupported { reason } => {
                tracing::warn!(
                    record = %record.id,
                    field = %field,
                    reason = %reason,
                    "Skipping unsupported embedded object"
                );
                report.diagnostics.push(Diagnostic::UnsupportedEmbedded {
                    record: record.id.clone(),
                    field: field.to_string(),
                    reason: reason.clone(),
                });
            }
        }
        Ok(())
    }
}
