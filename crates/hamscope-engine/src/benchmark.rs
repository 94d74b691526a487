//! Baseline-vs-active benchmark aggregation.
//!
//! Tasks carry no token counts of their own; each task's usage is
//! correlated against the session whose interval fully contains it, with
//! the session's tokens apportioned by wall-clock fraction.

use hamscope_types::{Session, Task, round2};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::window::{filter_by_days, filter_tasks_by_days};

/// Tokens attributed to a task.
///
/// The containing session's total tokens, scaled by the task's share of the
/// session's duration; the task's self-reported estimate when no session
/// contains it.
pub fn correlate_tokens(task: &Task, sessions: &[&Session]) -> u64 {
    let task_duration = task.duration_ms;
    if task_duration <= 0 {
        return task.estimated_tokens;
    }

    for s in sessions {
        let Some((start, end)) = session_interval(s) else {
            continue;
        };
        if task.start_time >= start && task.end_time <= end {
            let session_duration = (end - start).num_milliseconds();
            if session_duration <= 0 {
                continue;
            }
            let fraction = task_duration as f64 / session_duration as f64;
            return (s.total_tokens() as f64 * fraction).round() as u64;
        }
    }

    task.estimated_tokens
}

/// Cache-hit percentage from the containing session; 0 when no session
/// contains the task or the session saw no input tokens.
pub fn cache_rate(task: &Task, sessions: &[&Session]) -> f64 {
    for s in sessions {
        let Some((start, end)) = session_interval(s) else {
            continue;
        };
        if task.start_time >= start && task.end_time <= end {
            return round2(s.cache_hit_percent());
        }
    }
    0.0
}

fn session_interval(
    s: &Session,
) -> Option<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> {
    let start = s.start_time?;
    let end = s
        .end_time
        .unwrap_or(start + chrono::Duration::milliseconds(s.duration_ms));
    Some((start, end))
}

/// Per-group averages (one side of the baseline/active split).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub count: usize,
    pub avg_wall_clock_sec: f64,
    pub avg_tokens: u64,
    pub avg_files_read: f64,
    pub avg_cache_rate: f64,
}

fn summarize_group(tasks: &[&Task], sessions: &[&Session]) -> Option<GroupStats> {
    if tasks.is_empty() {
        return None;
    }
    let count = tasks.len();
    let total_duration: f64 = tasks.iter().map(|t| t.duration_sec()).sum();
    let total_tokens: u64 = tasks.iter().map(|t| correlate_tokens(t, sessions)).sum();
    let total_files: u64 = tasks.iter().map(|t| t.files_read).sum();
    let total_cache: f64 = tasks.iter().map(|t| cache_rate(t, sessions)).sum();
    Some(GroupStats {
        count,
        avg_wall_clock_sec: round2(total_duration / count as f64),
        avg_tokens: (total_tokens as f64 / count as f64).round() as u64,
        avg_files_read: round2(total_files as f64 / count as f64),
        avg_cache_rate: round2(total_cache / count as f64),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByMode {
    pub baseline: Option<GroupStats>,
    pub active: Option<GroupStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
    pub total_tasks: usize,
    pub avg_wall_clock_sec: f64,
    pub avg_tokens: u64,
    pub avg_files_read: f64,
    pub avg_cache_rate: f64,
    pub by_mode: ByMode,
}

/// Overall averages across both logs, windowed, with a per-mode split.
pub fn calculate_summary(
    baseline_tasks: &[Task],
    active_tasks: &[Task],
    sessions: &[Session],
    days: u32,
) -> BenchmarkSummary {
    let filtered = filter_by_days(sessions, days);
    let all: Vec<&Task> = baseline_tasks.iter().chain(active_tasks.iter()).collect();
    let window = filter_tasks_by_days(&all, days);

    let Some(overall) = summarize_group(&window, &filtered) else {
        return BenchmarkSummary {
            total_tasks: 0,
            avg_wall_clock_sec: 0.0,
            avg_tokens: 0,
            avg_files_read: 0.0,
            avg_cache_rate: 0.0,
            by_mode: ByMode {
                baseline: None,
                active: None,
            },
        };
    };

    let baseline_group: Vec<&Task> = window
        .iter()
        .filter(|t| !t.scoping_active)
        .copied()
        .collect();
    let active_group: Vec<&Task> = window
        .iter()
        .filter(|t| t.scoping_active)
        .copied()
        .collect();

    BenchmarkSummary {
        total_tasks: overall.count,
        avg_wall_clock_sec: overall.avg_wall_clock_sec,
        avg_tokens: overall.avg_tokens,
        avg_files_read: overall.avg_files_read,
        avg_cache_rate: overall.avg_cache_rate,
        by_mode: ByMode {
            baseline: summarize_group(&baseline_group, &filtered),
            active: summarize_group(&active_group, &filtered),
        },
    }
}

/// Group figures used by the comparison (no files-read average).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeStats {
    pub count: usize,
    pub avg_time_sec: f64,
    pub avg_tokens: u64,
    pub avg_cache_rate: f64,
}

fn mode_stats(tasks: &[&Task], sessions: &[&Session]) -> Option<ModeStats> {
    summarize_group(tasks, sessions).map(|g| ModeStats {
        count: g.count,
        avg_time_sec: g.avg_wall_clock_sec,
        avg_tokens: g.avg_tokens,
        avg_cache_rate: g.avg_cache_rate,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDeltas {
    pub time_delta: f64,
    pub time_pct: f64,
    pub token_delta: i64,
    pub token_pct: f64,
    pub cache_delta: f64,
    /// Per-task token reduction x active count; zero if tokens went up.
    pub estimated_savings: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparison {
    pub total: usize,
    pub baseline: Option<ModeStats>,
    pub active: Option<ModeStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub has_data: bool,
    pub baseline: Option<ModeStats>,
    pub active: Option<ModeStats>,
    pub comparison: Option<ComparisonDeltas>,
    pub by_model: BTreeMap<String, ModelComparison>,
}

/// Baseline-vs-active comparison with deltas and a per-model breakdown.
///
/// Tasks are not windowed here; only the sessions used for correlation are.
pub fn calculate_comparison(
    baseline_tasks: &[Task],
    active_tasks: &[Task],
    sessions: &[Session],
    days: u32,
) -> BenchmarkComparison {
    if baseline_tasks.is_empty() && active_tasks.is_empty() {
        return BenchmarkComparison {
            has_data: false,
            baseline: None,
            active: None,
            comparison: None,
            by_model: BTreeMap::new(),
        };
    }

    let filtered = filter_by_days(sessions, days);
    let baseline_refs: Vec<&Task> = baseline_tasks.iter().collect();
    let active_refs: Vec<&Task> = active_tasks.iter().collect();

    let baseline = mode_stats(&baseline_refs, &filtered);
    let active = mode_stats(&active_refs, &filtered);

    let comparison = match (&baseline, &active) {
        (Some(b), Some(a)) => {
            let time_delta = round2(a.avg_time_sec - b.avg_time_sec);
            let token_delta = a.avg_tokens as i64 - b.avg_tokens as i64;
            Some(ComparisonDeltas {
                time_delta,
                time_pct: if b.avg_time_sec > 0.0 {
                    round2(time_delta / b.avg_time_sec * 100.0)
                } else {
                    0.0
                },
                token_delta,
                token_pct: if b.avg_tokens > 0 {
                    round2(token_delta as f64 / b.avg_tokens as f64 * 100.0)
                } else {
                    0.0
                },
                cache_delta: round2(a.avg_cache_rate - b.avg_cache_rate),
                estimated_savings: if token_delta < 0 {
                    token_delta.unsigned_abs() * a.count as u64
                } else {
                    0
                },
            })
        }
        _ => None,
    };

    let mut by_model: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
    for t in baseline_tasks.iter().chain(active_tasks.iter()) {
        by_model.entry(t.model.clone()).or_default().push(t);
    }
    let by_model = by_model
        .into_iter()
        .map(|(model, tasks)| {
            let b: Vec<&Task> = tasks.iter().filter(|t| !t.scoping_active).copied().collect();
            let a: Vec<&Task> = tasks.iter().filter(|t| t.scoping_active).copied().collect();
            (
                model,
                ModelComparison {
                    total: tasks.len(),
                    baseline: mode_stats(&b, &filtered),
                    active: mode_stats(&a, &filtered),
                },
            )
        })
        .collect();

    BenchmarkComparison {
        has_data: true,
        baseline,
        active,
        comparison,
        by_model,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTask {
    pub id: String,
    pub description: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub duration_sec: f64,
    pub tokens: u64,
    pub model: String,
    pub scoping_active: bool,
    pub files_read: u64,
    pub cache_rate: f64,
    pub status: String,
}

/// Last `limit` tasks across both logs, newest first, with correlated
/// token counts.
pub fn recent_tasks(
    baseline_tasks: &[Task],
    active_tasks: &[Task],
    sessions: &[Session],
    limit: usize,
    days: u32,
) -> Vec<RecentTask> {
    let filtered = filter_by_days(sessions, days);
    let mut all: Vec<&Task> = baseline_tasks.iter().chain(active_tasks.iter()).collect();
    all.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    all.into_iter()
        .take(limit)
        .map(|t| RecentTask {
            id: t.id.clone(),
            description: t.description.clone(),
            start_time: t.start_time,
            duration_sec: t.duration_sec(),
            tokens: correlate_tokens(t, &filtered),
            model: t.model.clone(),
            scoping_active: t.scoping_active,
            files_read: t.files_read,
            cache_rate: cache_rate(t, &filtered),
            status: t.status.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use hamscope_testing::SessionBuilder;

    fn task(id: &str, minutes_ago_start: i64, minutes_long: i64, active: bool) -> Task {
        let start = Utc::now() - Duration::minutes(minutes_ago_start);
        let end = start + Duration::minutes(minutes_long);
        Task {
            id: id.to_string(),
            description: format!("task {id}"),
            start_time: start,
            end_time: end,
            duration_ms: (end - start).num_milliseconds(),
            scoping_active: active,
            model: "claude-sonnet-4-5".to_string(),
            files_read: 4,
            memory_files_loaded: 1,
            status: "completed".to_string(),
            estimated_tokens: 777,
        }
    }

    #[test]
    fn contained_task_gets_apportioned_tokens() {
        let session_start = Utc::now() - Duration::minutes(60);
        let session_end = session_start + Duration::minutes(40);
        let sessions = vec![
            SessionBuilder::new("s1")
                .interval(session_start, session_end)
                .tokens(8_000, 2_000)
                .build(),
        ];
        // Task covers 10 of the session's 40 minutes.
        let t = task("t1", 50, 10, true);
        let filtered: Vec<&_> = sessions.iter().collect();
        assert_eq!(correlate_tokens(&t, &filtered), 2_500);
    }

    #[test]
    fn uncontained_task_falls_back_to_estimate() {
        let t = task("t1", 500, 10, true);
        let sessions = vec![SessionBuilder::new("s1").build()];
        let filtered: Vec<&_> = sessions.iter().collect();
        assert_eq!(correlate_tokens(&t, &filtered), 777);
    }

    #[test]
    fn zero_duration_task_uses_estimate() {
        let t = task("t1", 30, 0, true);
        let sessions = vec![SessionBuilder::new("s1").build()];
        let filtered: Vec<&_> = sessions.iter().collect();
        assert_eq!(correlate_tokens(&t, &filtered), 777);
    }

    #[test]
    fn cache_rate_comes_from_containing_session() {
        let session_start = Utc::now() - Duration::minutes(60);
        let session_end = session_start + Duration::minutes(40);
        let sessions = vec![
            SessionBuilder::new("s1")
                .interval(session_start, session_end)
                .tokens(1_000, 0)
                .cache_read(250)
                .build(),
        ];
        let t = task("t1", 50, 10, true);
        let filtered: Vec<&_> = sessions.iter().collect();
        assert_eq!(cache_rate(&t, &filtered), 25.0);
        let orphan = task("t2", 5000, 10, true);
        assert_eq!(cache_rate(&orphan, &filtered), 0.0);
    }

    #[test]
    fn empty_logs_give_empty_summary() {
        let summary = calculate_summary(&[], &[], &[], 30);
        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.avg_tokens, 0);
        assert!(summary.by_mode.baseline.is_none());
        assert!(summary.by_mode.active.is_none());

        let cmp = calculate_comparison(&[], &[], &[], 30);
        assert!(!cmp.has_data);
        assert!(cmp.comparison.is_none());
    }

    #[test]
    fn comparison_reports_token_savings_when_active_is_cheaper() {
        // Uncontained tasks so tokens come from self-reported estimates.
        let mut baseline = task("b1", 100, 10, false);
        baseline.estimated_tokens = 10_000;
        let mut active1 = task("a1", 80, 10, true);
        active1.estimated_tokens = 4_000;
        let mut active2 = task("a2", 60, 10, true);
        active2.estimated_tokens = 4_000;

        let cmp = calculate_comparison(&[baseline], &[active1, active2], &[], 30);
        assert!(cmp.has_data);
        let deltas = cmp.comparison.unwrap();
        assert_eq!(deltas.token_delta, -6_000);
        assert_eq!(deltas.estimated_savings, 12_000);
        assert_eq!(cmp.by_model.len(), 1);
        let model = cmp.by_model.get("claude-sonnet-4-5").unwrap();
        assert_eq!(model.total, 3);
        assert_eq!(model.baseline.as_ref().unwrap().count, 1);
        assert_eq!(model.active.as_ref().unwrap().count, 2);
    }

    #[test]
    fn no_savings_when_tokens_increase() {
        let mut baseline = task("b1", 100, 10, false);
        baseline.estimated_tokens = 1_000;
        let mut active = task("a1", 80, 10, true);
        active.estimated_tokens = 5_000;
        let cmp = calculate_comparison(&[baseline], &[active], &[], 30);
        assert_eq!(cmp.comparison.unwrap().estimated_savings, 0);
    }

    #[test]
    fn recent_tasks_are_newest_first_and_limited() {
        let tasks: Vec<Task> = (0..5).map(|i| task(&format!("t{i}"), 100 - i * 10, 5, true)).collect();
        let recent = recent_tasks(&[], &tasks, &[], 3, 30);
        assert_eq!(recent.len(), 3);
        let ids: Vec<&str> = recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t4", "t3", "t2"]);
    }

    #[test]
    fn summary_splits_by_mode() {
        let baseline = vec![task("b1", 100, 10, false)];
        let active = vec![task("a1", 80, 10, true), task("a2", 60, 20, true)];
        let summary = calculate_summary(&baseline, &active, &[], 30);
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.by_mode.baseline.as_ref().unwrap().count, 1);
        assert_eq!(summary.by_mode.active.as_ref().unwrap().count, 2);
        assert_eq!(summary.by_mode.active.as_ref().unwrap().avg_wall_clock_sec, 900.0);
    }
}
