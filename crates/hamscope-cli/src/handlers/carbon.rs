use anyhow::Result;
use hamscope_providers::ProjectSnapshot;

use crate::output::print_json;

pub fn summary(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let health = snapshot.scan_health();
    let summary = hamscope_engine::calculate_carbon(&snapshot.sessions, days, &health);
    print_json(&summary)
}

pub fn daily(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let health = snapshot.scan_health();
    let daily = hamscope_engine::calculate_carbon_daily(&snapshot.sessions, days, &health);
    print_json(&daily)
}

pub fn sessions(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let health = snapshot.scan_health();
    let rows = hamscope_engine::calculate_carbon_sessions(
        &snapshot.sessions,
        days,
        &snapshot.project_root,
        &health,
    );
    print_json(&rows)
}

pub fn files(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let health = snapshot.scan_health();
    let stats = hamscope_engine::calculate_carbon_files(
        &snapshot.sessions,
        days,
        &snapshot.project_root,
        &health,
    );
    print_json(&stats)
}
