//! In-memory session builder for aggregator tests.

use chrono::{DateTime, Duration, Utc};
use hamscope_types::{RoutingStatus, Session};
use std::path::PathBuf;

/// Builder producing fully-populated [`Session`] values without any I/O.
///
/// Defaults describe a small recent session; tests override what they care
/// about. Times are expressed relative to now so window filters behave the
/// same whenever the tests run.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    session: Session,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new("session-1")
    }
}

impl SessionBuilder {
    pub fn new(id: &str) -> Self {
        let start = Utc::now() - Duration::hours(1);
        Self {
            session: Session {
                session_id: id.to_string(),
                start_time: Some(start),
                end_time: Some(start + Duration::minutes(10)),
                duration_ms: 600_000,
                model: Some("claude-sonnet-4-5".to_string()),
                input_tokens: 1_000,
                output_tokens: 200,
                cache_read_tokens: 0,
                cache_creation_tokens: 0,
                file_reads: Vec::new(),
                context_reads: Vec::new(),
                scoping_active: false,
                routing_status: RoutingStatus::Unrouted,
                primary_directory: None,
                message_count: 4,
                tool_call_count: 2,
            },
        }
    }

    /// Shift the session to start `days` ago (duration preserved).
    pub fn days_ago(mut self, days: i64) -> Self {
        let start = Utc::now() - Duration::days(days);
        let duration = Duration::milliseconds(self.session.duration_ms);
        self.session.start_time = Some(start);
        self.session.end_time = Some(start + duration);
        self
    }

    pub fn interval(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.session.start_time = Some(start);
        self.session.end_time = Some(end);
        self.session.duration_ms = (end - start).num_milliseconds();
        self
    }

    pub fn tokens(mut self, input: u64, output: u64) -> Self {
        self.session.input_tokens = input;
        self.session.output_tokens = output;
        self
    }

    pub fn cache_read(mut self, tokens: u64) -> Self {
        self.session.cache_read_tokens = tokens;
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.session.model = Some(model.to_string());
        self
    }

    pub fn reads(mut self, paths: &[&str]) -> Self {
        self.session.file_reads = paths.iter().map(PathBuf::from).collect();
        self.session.context_reads = self
            .session
            .file_reads
            .iter()
            .filter(|p| hamscope_types::is_context_file(p))
            .cloned()
            .collect();
        self
    }

    pub fn scoping_active(mut self, active: bool) -> Self {
        self.session.scoping_active = active;
        self
    }

    pub fn routing(mut self, status: RoutingStatus) -> Self {
        self.session.routing_status = status;
        self
    }

    pub fn primary_directory(mut self, dir: &str) -> Self {
        self.session.primary_directory = Some(dir.to_string());
        self
    }

    pub fn messages(mut self, count: usize) -> Self {
        self.session.message_count = count;
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}
