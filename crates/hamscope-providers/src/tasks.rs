//! Task-event log parsing and the persisted benchmark state blob.
//!
//! Two append-only JSONL logs live under `.ham/metrics/`: `baseline.jsonl`
//! for runs without scoped context and `tasks.jsonl` for runs with it. Each
//! task is a `task_start` record paired with the `task_end` record of the
//! same id; unmatched starts are dropped when the parse ends.

use chrono::{DateTime, Utc};
use hamscope_types::{BenchmarkMode, Task};
use serde::Deserialize;
use std::path::Path;

pub const ACTIVE_LOG: &str = "tasks.jsonl";
pub const BASELINE_LOG: &str = "baseline.jsonl";
const STATE_FILE: &str = "state.json";

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
enum TaskRecord {
    TaskStart(TaskStart),
    TaskEnd(TaskEnd),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct TaskStart {
    id: String,
    timestamp: String,
    #[serde(default)]
    description: String,
    /// Captured at start time; absent means scoped context was in effect.
    #[serde(default = "default_true")]
    ham_active: bool,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    files_read: u64,
    #[serde(default)]
    memory_files_loaded: u64,
    #[serde(default)]
    estimated_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct TaskEnd {
    id: String,
    timestamp: String,
    #[serde(default)]
    status: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Persisted benchmarking lifecycle, read from `.ham/metrics/state.json`.
///
/// The mode is decoded strictly; any remaining progress fields pass through
/// untyped for the UI layer. A missing or corrupt blob means no benchmark is
/// in flight.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub struct BenchmarkState {
    #[serde(default)]
    pub mode: BenchmarkMode,
    #[serde(flatten)]
    pub progress: serde_json::Map<String, serde_json::Value>,
}

/// Tasks from both event logs.
#[derive(Debug, Clone, Default)]
pub struct TaskLogs {
    /// Runs recorded without scoped context.
    pub baseline: Vec<Task>,
    /// Runs recorded with scoped context.
    pub active: Vec<Task>,
}

impl TaskLogs {
    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty() && self.active.is_empty()
    }

    /// Baseline then active, as one list.
    pub fn all(&self) -> Vec<Task> {
        self.baseline
            .iter()
            .chain(self.active.iter())
            .cloned()
            .collect()
    }
}

/// Read and pair both task-event logs for a project.
pub fn load_task_logs(project_root: &Path) -> TaskLogs {
    TaskLogs {
        baseline: read_task_log(project_root, BASELINE_LOG),
        active: read_task_log(project_root, ACTIVE_LOG),
    }
}

/// Read one task-event log and pair its start/end records.
///
/// Missing file, unreadable file, or malformed lines all degrade to fewer
/// tasks, never to an error.
pub fn read_task_log(project_root: &Path, filename: &str) -> Vec<Task> {
    let path = hamscope_core::metrics_dir(project_root).join(filename);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let records = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<TaskRecord>(l).ok());

    pair_task_records(records)
}

fn pair_task_records(records: impl Iterator<Item = TaskRecord>) -> Vec<Task> {
    let mut starts: std::collections::HashMap<String, TaskStart> = std::collections::HashMap::new();
    let mut tasks = Vec::new();

    for record in records {
        match record {
            TaskRecord::TaskStart(start) => {
                starts.insert(start.id.clone(), start);
            }
            TaskRecord::TaskEnd(end) => {
                let Some(start) = starts.remove(&end.id) else {
                    continue; // end without a start
                };
                let (Some(start_time), Some(end_time)) =
                    (parse_ts(&start.timestamp), parse_ts(&end.timestamp))
                else {
                    continue;
                };
                // Duration may be zero or negative when source clocks
                // disagree; downstream guards handle it.
                let duration_ms = (end_time - start_time).num_milliseconds();
                tasks.push(Task {
                    id: end.id,
                    description: start.description,
                    start_time,
                    end_time,
                    duration_ms,
                    scoping_active: start.ham_active,
                    model: start.model.unwrap_or_else(|| "unknown".to_string()),
                    files_read: start.files_read,
                    memory_files_loaded: start.memory_files_loaded,
                    status: end.status.unwrap_or_else(|| "completed".to_string()),
                    estimated_tokens: start.estimated_tokens,
                });
            }
            TaskRecord::Unknown => {}
        }
    }

    tasks
}

fn parse_ts(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Read the persisted benchmark state; missing or corrupt means mode none.
pub fn load_benchmark_state(project_root: &Path) -> BenchmarkState {
    let path = hamscope_core::metrics_dir(project_root).join(STATE_FILE);
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(lines: &[&str]) -> Vec<Task> {
        pair_task_records(
            lines
                .iter()
                .filter_map(|l| serde_json::from_str::<TaskRecord>(l).ok()),
        )
    }

    #[test]
    fn pairs_start_and_end_by_id() {
        let tasks = records(&[
            r#"{"type":"task_start","id":"t1","timestamp":"2025-06-01T10:00:00Z","description":"fix bug","ham_active":false,"model":"claude-sonnet-4-5","files_read":3,"estimated_tokens":5000}"#,
            r#"{"type":"task_end","id":"t1","timestamp":"2025-06-01T10:01:30Z","status":"completed"}"#,
        ]);
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.id, "t1");
        assert_eq!(t.duration_ms, 90_000);
        assert_eq!(t.duration_sec(), 90.0);
        assert!(!t.scoping_active);
        assert_eq!(t.estimated_tokens, 5000);
    }

    #[test]
    fn unmatched_starts_and_ends_are_dropped() {
        let tasks = records(&[
            r#"{"type":"task_start","id":"lonely","timestamp":"2025-06-01T10:00:00Z"}"#,
            r#"{"type":"task_end","id":"orphan","timestamp":"2025-06-01T10:05:00Z"}"#,
        ]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn scoping_defaults_to_active() {
        let tasks = records(&[
            r#"{"type":"task_start","id":"t1","timestamp":"2025-06-01T10:00:00Z"}"#,
            r#"{"type":"task_end","id":"t1","timestamp":"2025-06-01T10:00:10Z"}"#,
        ]);
        assert!(tasks[0].scoping_active);
        assert_eq!(tasks[0].model, "unknown");
        assert_eq!(tasks[0].status, "completed");
    }

    #[test]
    fn inconsistent_clocks_yield_negative_duration() {
        let tasks = records(&[
            r#"{"type":"task_start","id":"t1","timestamp":"2025-06-01T10:05:00Z"}"#,
            r#"{"type":"task_end","id":"t1","timestamp":"2025-06-01T10:00:00Z"}"#,
        ]);
        assert_eq!(tasks[0].duration_ms, -300_000);
    }

    #[test]
    fn unknown_record_kinds_are_ignored() {
        let tasks = records(&[
            r#"{"type":"heartbeat","id":"x","timestamp":"2025-06-01T10:00:00Z"}"#,
            r#"{"type":"task_start","id":"t1","timestamp":"2025-06-01T10:00:00Z"}"#,
            r#"{"type":"task_end","id":"t1","timestamp":"2025-06-01T10:00:05Z"}"#,
        ]);
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn state_decodes_mode_and_passthrough() {
        let state: BenchmarkState =
            serde_json::from_str(r#"{"mode":"baseline","completed":3,"total":10}"#).unwrap();
        assert_eq!(state.mode, BenchmarkMode::Baseline);
        assert_eq!(state.progress.get("completed").unwrap(), 3);
    }
}
