use anyhow::Result;
use hamscope_providers::{ProjectSnapshot, load_benchmark_state};

use crate::output::print_json;

pub fn summary(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let logs = snapshot.load_task_logs();
    let summary =
        hamscope_engine::calculate_summary(&logs.baseline, &logs.active, &snapshot.sessions, days);
    print_json(&summary)
}

pub fn compare(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let logs = snapshot.load_task_logs();
    let comparison = hamscope_engine::calculate_comparison(
        &logs.baseline,
        &logs.active,
        &snapshot.sessions,
        days,
    );
    print_json(&comparison)
}

pub fn recent(snapshot: &ProjectSnapshot, days: u32, limit: usize) -> Result<()> {
    let logs = snapshot.load_task_logs();
    let tasks = hamscope_engine::recent_tasks(
        &logs.baseline,
        &logs.active,
        &snapshot.sessions,
        limit,
        days,
    );
    print_json(&tasks)
}

pub fn status(snapshot: &ProjectSnapshot) -> Result<()> {
    let state = load_benchmark_state(&snapshot.project_root);
    print_json(&state)
}
