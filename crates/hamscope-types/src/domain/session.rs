use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::is_context_file;

/// How a session engaged with the context-routing table declared in the
/// root context file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStatus {
    /// The read immediately after the root context file was a routed path.
    Routed,
    /// Some later read after the root context file was a routed path.
    Likely,
    /// No routing table, root file never read, or no routed path followed.
    Unrouted,
}

impl Default for RoutingStatus {
    fn default() -> Self {
        Self::Unrouted
    }
}

/// One reconstructed agent conversation, assembled from a single transcript
/// file.
///
/// Sessions are value objects: built in one parsing pass, never mutated
/// afterwards. A transcript that never carries a session id produces no
/// Session at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session identifier from the first record that carried one.
    pub session_id: String,
    /// Earliest timestamp seen anywhere in the transcript.
    pub start_time: Option<DateTime<Utc>>,
    /// Latest timestamp seen anywhere in the transcript.
    pub end_time: Option<DateTime<Utc>>,
    /// end - start in milliseconds; 0 when fewer than two timestamps exist.
    pub duration_ms: i64,
    /// First non-null model name from any assistant message.
    pub model: Option<String>,

    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,

    /// Every path opened by the Read tool, in order, duplicates preserved.
    pub file_reads: Vec<PathBuf>,
    /// Subset of `file_reads` whose basename is the context filename.
    pub context_reads: Vec<PathBuf>,

    /// True iff at least one non-root context file inside the project tree
    /// was read.
    pub scoping_active: bool,
    pub routing_status: RoutingStatus,
    /// Project-relative directory with the most non-context reads, if any.
    pub primary_directory: Option<String>,

    /// Assistant plus user messages.
    pub message_count: usize,
    pub tool_call_count: usize,
}

impl Session {
    /// Input plus output tokens.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// File reads excluding context-file reads.
    pub fn non_context_read_count(&self) -> usize {
        self.file_reads
            .iter()
            .filter(|p| !is_context_file(p))
            .count()
    }

    /// Fraction of input served from cache, as a percentage. Zero when the
    /// session saw no fresh input tokens.
    pub fn cache_hit_percent(&self) -> f64 {
        if self.input_tokens == 0 {
            return 0.0;
        }
        (self.cache_read_tokens as f64 / self.input_tokens as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_reads(reads: &[&str]) -> Session {
        Session {
            session_id: "s1".to_string(),
            start_time: None,
            end_time: None,
            duration_ms: 0,
            model: None,
            input_tokens: 100,
            output_tokens: 20,
            cache_read_tokens: 50,
            cache_creation_tokens: 0,
            file_reads: reads.iter().map(PathBuf::from).collect(),
            context_reads: Vec::new(),
            scoping_active: false,
            routing_status: RoutingStatus::Unrouted,
            primary_directory: None,
            message_count: 2,
            tool_call_count: 1,
        }
    }

    #[test]
    fn non_context_reads_exclude_context_files() {
        let s = session_with_reads(&["/p/src/a.rs", "/p/src/CLAUDE.md", "/p/src/b.rs"]);
        assert_eq!(s.non_context_read_count(), 2);
    }

    #[test]
    fn cache_hit_percent_guards_zero_input() {
        let mut s = session_with_reads(&[]);
        assert_eq!(s.cache_hit_percent(), 50.0);
        s.input_tokens = 0;
        assert_eq!(s.cache_hit_percent(), 0.0);
    }
}
