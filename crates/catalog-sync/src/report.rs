//! Run report: lifecycle, counters, and diagnostics of one load run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use catalog_core::{ReloadMode, RunState};

/// A non-fatal condition observed while loading. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A link value had no vertex; it was stored as a literal instead.
    UnresolvedLink {
        record: String,
        field: String,
        value: String,
    },
    /// Page layout metadata was skipped.
    LayoutSkipped { record: String },
    /// An embedded object of unknown shape was skipped.
    UnsupportedEmbedded {
        record: String,
        field: String,
        reason: String,
    },
}

/// Summary of a load run, printed as JSON by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub mode: ReloadMode,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub records: usize,
    pub vertices_cleared: u64,
    pub vertices_upserted: u64,
    pub properties_set: u64,
    pub edges_created: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn new(mode: ReloadMode) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            mode,
            state: RunState::Fetching,
            started_at: Utc::now(),
            finished_at: None,
            records: 0,
            vertices_cleared: 0,
            vertices_upserted: 0,
            properties_set: 0,
            edges_created: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Move to the next lifecycle state.
    pub fn transition(&mut self, next: RunState) {
        tracing::info!(run_id = %self.run_id, from = ?self.state, to = ?next, "Run state change");
        self.state = next;
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
    }

    pub fn unresolved_links(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnresolvedLink { .. }))
            .count()
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_transition_stamps_finish_time() {
        let mut report = RunReport::new(ReloadMode::Full);
        report.transition(RunState::Clearing);
        assert!(report.finished_at.is_none());

        report.transition(RunState::Done);
        assert_eq!(report.state, RunState::Done);
        assert!(report.duration_ms().is_some());
    }

    #[test]
    fn diagnostics_serialize_with_kind_tag() {
        let diag = Diagnostic::UnresolvedLink {
            record: "B1".to_string(),
            field: "gene".to_string(),
            value: "A9".to_string(),
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"kind\":\"unresolved_link\""));
    }
}
