//! Lookback-window filtering shared by every aggregator.

use chrono::{Duration, Utc};
use hamscope_types::{Session, Task};

/// Sessions whose start time falls within the last `days` days.
///
/// Sessions without a start time never make it into a window.
pub fn filter_by_days(sessions: &[Session], days: u32) -> Vec<&Session> {
    let cutoff = Utc::now() - Duration::days(days as i64);
    sessions
        .iter()
        .filter(|s| s.start_time.is_some_and(|t| t >= cutoff))
        .collect()
}

/// Tasks whose start timestamp falls within the last `days` days.
pub fn filter_tasks_by_days<'a>(tasks: &[&'a Task], days: u32) -> Vec<&'a Task> {
    let cutoff = Utc::now() - Duration::days(days as i64);
    tasks
        .iter()
        .filter(|t| t.start_time >= cutoff)
        .copied()
        .collect()
}
