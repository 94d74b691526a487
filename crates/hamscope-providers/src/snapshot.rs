//! Immutable snapshot of a project's parsed session data.

use hamscope_types::{HealthEntry, Session};
use std::path::{Path, PathBuf};

use crate::health::scan_context_health;
use crate::tasks::{TaskLogs, load_task_logs};
use crate::transcript::{ParseWarning, parse_sessions};

/// Everything the aggregators need, parsed once.
///
/// A snapshot is built by an explicit [`ProjectSnapshot::load`] call and
/// never mutated; refreshing means building a new snapshot and replacing the
/// old one wholesale. Aggregation functions take it (or slices of it) by
/// reference, so there is no ambient global to invalidate.
#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    pub project_root: PathBuf,
    /// Reconstructed sessions, newest first.
    pub sessions: Vec<Session>,
    /// Transcript files that were skipped, with reasons.
    pub warnings: Vec<ParseWarning>,
}

impl ProjectSnapshot {
    /// Parse every transcript for the project into a fresh snapshot.
    pub fn load(project_root: &Path) -> Self {
        let batch = parse_sessions(project_root);
        Self::from_batch(project_root, batch)
    }

    /// Like [`ProjectSnapshot::load`] but with an explicit log root.
    pub fn load_at(log_root: &Path, project_root: &Path) -> Self {
        let batch = crate::transcript::parse_sessions_at(log_root, project_root);
        Self::from_batch(project_root, batch)
    }

    fn from_batch(project_root: &Path, batch: crate::transcript::SessionBatch) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            sessions: batch.sessions,
            warnings: batch.warnings,
        }
    }

    /// Run the context-health scan against this snapshot's sessions.
    /// Walks the project tree, so this is an I/O call, not a pure one.
    pub fn scan_health(&self) -> Vec<HealthEntry> {
        scan_context_health(&self.project_root, &self.sessions)
    }

    /// Read and pair both task-event logs for this project.
    pub fn load_task_logs(&self) -> TaskLogs {
        load_task_logs(&self.project_root)
    }
}
