//! Daily and per-directory breakdowns of the windowed session set.

use chrono::{Duration, Utc};
use hamscope_types::{Session, calculate_cost, date_key, round2};
use serde::Serialize;
use std::collections::HashMap;

use crate::window::filter_by_days;

/// One calendar day's totals. Days without sessions are zero-filled so
/// chart consumers never see gaps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: String,
    pub sessions: usize,
    pub scoped_sessions: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cost: f64,
    pub file_reads: usize,
}

impl DailyBucket {
    fn empty(date: String) -> Self {
        Self {
            date,
            sessions: 0,
            scoped_sessions: 0,
            input_tokens: 0,
            output_tokens: 0,
            cache_read_tokens: 0,
            cost: 0.0,
            file_reads: 0,
        }
    }
}

/// Totals for one primary directory. Directories with no attributed
/// sessions are absent, not zero-filled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryBucket {
    pub directory: String,
    pub sessions: usize,
    pub scoped_sessions: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub file_reads: usize,
    pub cost: f64,
}

/// Label for sessions that never produced a primary-directory attribution.
pub const UNATTRIBUTED: &str = "(unattributed)";

pub fn calculate_daily(sessions: &[Session], days: u32) -> Vec<DailyBucket> {
    let filtered = filter_by_days(sessions, days);
    let mut by_date: HashMap<String, DailyBucket> = HashMap::new();

    for s in &filtered {
        let Some(start) = s.start_time else {
            continue;
        };
        let key = date_key(start);
        let bucket = by_date
            .entry(key.clone())
            .or_insert_with(|| DailyBucket::empty(key));
        bucket.sessions += 1;
        if s.scoping_active {
            bucket.scoped_sessions += 1;
        }
        bucket.input_tokens += s.input_tokens;
        bucket.output_tokens += s.output_tokens;
        bucket.cache_read_tokens += s.cache_read_tokens;
        bucket.cost += calculate_cost(s.input_tokens, s.output_tokens, s.model.as_deref());
        bucket.file_reads += s.file_reads.len();
    }

    let now = Utc::now();
    let mut result = Vec::with_capacity(days as usize);
    for i in (0..days as i64).rev() {
        let key = date_key(now - Duration::days(i));
        let mut bucket = by_date
            .remove(&key)
            .unwrap_or_else(|| DailyBucket::empty(key));
        bucket.cost = round2(bucket.cost);
        result.push(bucket);
    }
    result
}

pub fn calculate_directories(sessions: &[Session], days: u32) -> Vec<DirectoryBucket> {
    let filtered = filter_by_days(sessions, days);
    let mut by_dir: HashMap<String, DirectoryBucket> = HashMap::new();

    for s in &filtered {
        let dir = s
            .primary_directory
            .clone()
            .unwrap_or_else(|| UNATTRIBUTED.to_string());
        let bucket = by_dir
            .entry(dir.clone())
            .or_insert_with(|| DirectoryBucket {
                directory: dir,
                sessions: 0,
                scoped_sessions: 0,
                input_tokens: 0,
                output_tokens: 0,
                file_reads: 0,
                cost: 0.0,
            });
        bucket.sessions += 1;
        if s.scoping_active {
            bucket.scoped_sessions += 1;
        }
        bucket.input_tokens += s.input_tokens;
        bucket.output_tokens += s.output_tokens;
        bucket.file_reads += s.file_reads.len();
        bucket.cost += calculate_cost(s.input_tokens, s.output_tokens, s.model.as_deref());
    }

    let mut result: Vec<DirectoryBucket> = by_dir.into_values().collect();
    for bucket in &mut result {
        bucket.cost = round2(bucket.cost);
    }
    result.sort_by(|a, b| {
        b.sessions
            .cmp(&a.sessions)
            .then_with(|| a.directory.cmp(&b.directory))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamscope_testing::SessionBuilder;

    #[test]
    fn daily_is_zero_filled_for_the_whole_window() {
        let sessions = vec![SessionBuilder::new("s1").days_ago(2).build()];
        let daily = calculate_daily(&sessions, 7);
        assert_eq!(daily.len(), 7);
        assert_eq!(daily.iter().map(|d| d.sessions).sum::<usize>(), 1);
        // Last bucket is today; the populated one sits two days back.
        assert_eq!(daily[4].sessions, 1);
        assert_eq!(daily[6].sessions, 0);
    }

    #[test]
    fn daily_accumulates_within_a_day() {
        let sessions = vec![
            SessionBuilder::new("s1")
                .days_ago(1)
                .tokens(100, 10)
                .scoping_active(true)
                .build(),
            SessionBuilder::new("s2").days_ago(1).tokens(200, 20).build(),
        ];
        let daily = calculate_daily(&sessions, 3);
        let day = &daily[1];
        assert_eq!(day.sessions, 2);
        assert_eq!(day.scoped_sessions, 1);
        assert_eq!(day.input_tokens, 300);
        assert_eq!(day.output_tokens, 30);
    }

    #[test]
    fn directories_sort_by_session_count() {
        let sessions = vec![
            SessionBuilder::new("s1").primary_directory("src").build(),
            SessionBuilder::new("s2").primary_directory("src").build(),
            SessionBuilder::new("s3").primary_directory("docs").build(),
            SessionBuilder::new("s4").build(),
        ];
        let dirs = calculate_directories(&sessions, 30);
        let names: Vec<&str> = dirs.iter().map(|d| d.directory.as_str()).collect();
        assert_eq!(names, vec!["src", UNATTRIBUTED, "docs"]);
        assert_eq!(dirs[0].sessions, 2);
    }
}
