use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall benchmarking lifecycle, persisted externally by the CLI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMode {
    None,
    Baseline,
    Active,
}

impl Default for BenchmarkMode {
    fn default() -> Self {
        Self::None
    }
}

/// One paired start/end event from a task-event log.
///
/// Built by matching a `task_start` record with the `task_end` record of the
/// same id; unmatched starts never become tasks. Immutable once paired.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// end - start; may be zero or negative when source clocks disagree.
    pub duration_ms: i64,
    /// Captured at start time. False marks a baseline-mode run.
    pub scoping_active: bool,
    pub model: String,
    pub files_read: u64,
    pub memory_files_loaded: u64,
    pub status: String,
    /// Self-reported token estimate, used only when no session correlates.
    pub estimated_tokens: u64,
}

impl Task {
    /// Wall-clock duration in seconds, rounded to two decimals.
    pub fn duration_sec(&self) -> f64 {
        crate::util::round2(self.duration_ms as f64 / 1000.0)
    }
}
