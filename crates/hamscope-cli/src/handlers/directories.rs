use anyhow::Result;
use hamscope_providers::ProjectSnapshot;

use crate::output::print_json;

pub fn handle(snapshot: &ProjectSnapshot, days: u32) -> Result<()> {
    let dirs = hamscope_engine::calculate_directories(&snapshot.sessions, days);
    print_json(&dirs)
}
