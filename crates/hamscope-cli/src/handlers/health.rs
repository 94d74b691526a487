use anyhow::Result;
use hamscope_providers::ProjectSnapshot;

use crate::output::print_json;

pub fn handle(snapshot: &ProjectSnapshot) -> Result<()> {
    let entries = snapshot.scan_health();
    print_json(&entries)
}
