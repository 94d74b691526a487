use anyhow::Result;
use hamscope_engine::filter_by_days;
use hamscope_providers::ProjectSnapshot;
use hamscope_types::Session;

use crate::output::print_json;

pub fn handle(snapshot: &ProjectSnapshot, days: u32, limit: usize) -> Result<()> {
    // Snapshot order is newest-first already.
    let sessions: Vec<&Session> = filter_by_days(&snapshot.sessions, days)
        .into_iter()
        .take(limit)
        .collect();
    print_json(&sessions)
}
