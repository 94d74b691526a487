use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coverage classification for a source directory's context file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Context file present and no staleness signal.
    Green,
    /// No own context file, but an ancestor's covers this directory.
    Yellow,
    /// Context file present but 2+ sessions touched the directory.
    Amber,
    /// No context file and no covering ancestor.
    Red,
}

impl HealthStatus {
    /// Sort rank: best news first (green=0 .. red=3).
    pub fn severity(&self) -> u8 {
        match self {
            HealthStatus::Green => 0,
            HealthStatus::Yellow => 1,
            HealthStatus::Amber => 2,
            HealthStatus::Red => 3,
        }
    }
}

/// Per-directory coverage record produced by the context health scan.
///
/// Only directories containing at least one source file get an entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntry {
    /// Directory path relative to the project root; "." is the root itself.
    pub path: String,
    pub has_context_file: bool,
    pub status: HealthStatus,
    /// Context file mtime; inherited from the covering ancestor for yellow.
    pub last_modified: Option<DateTime<Utc>>,
    /// Context file size in bytes; inherited for yellow entries.
    pub file_size: u64,
    /// Distinct sessions that read any non-context file in this directory.
    pub sessions_touched: usize,
    /// For yellow entries: the ancestor whose context file covers this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub covered_by: Option<String>,
}
