use anyhow::Result;
use hamscope_engine::insights::{InsightKind, Severity};
use hamscope_providers::ProjectSnapshot;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::output::print_json;

pub fn handle(snapshot: &ProjectSnapshot, days: u32, structured: bool) -> Result<()> {
    let stats = hamscope_engine::calculate_stats(&snapshot.sessions, days);
    let health = snapshot.scan_health();
    let daily = hamscope_engine::calculate_daily(&snapshot.sessions, days);

    if structured {
        let report = hamscope_engine::generate_structured_insights(&stats, &health, &daily, days);
        return print_json(&report);
    }

    let report = hamscope_engine::generate_insights(&stats, &health, &daily, days);
    let color = std::io::stdout().is_terminal();

    if color {
        println!("{}", report.summary.bold());
    } else {
        println!("{}", report.summary);
    }
    for line in &report.insights {
        println!();
        println!("  {}", line);
    }

    // Surface actionable items below the prose, worst first.
    let structured = hamscope_engine::generate_structured_insights(&stats, &health, &daily, days);
    let actions: Vec<_> = structured
        .items
        .iter()
        .filter(|i| i.kind == InsightKind::Action)
        .collect();
    if !actions.is_empty() {
        println!();
        if color {
            println!("{}", "Suggested actions:".bold());
        } else {
            println!("Suggested actions:");
        }
        for item in actions {
            let marker = match item.severity {
                Severity::High => "!",
                Severity::Medium => "~",
                Severity::Low => "-",
            };
            let line = match &item.action {
                Some(action) => format!("{marker} {}: {action}", item.title),
                None => format!("{marker} {}", item.title),
            };
            if color {
                match item.severity {
                    Severity::High => println!("  {}", line.red()),
                    Severity::Medium => println!("  {}", line.yellow()),
                    Severity::Low => println!("  {}", line),
                }
            } else {
                println!("  {}", line);
            }
        }
    }

    Ok(())
}
