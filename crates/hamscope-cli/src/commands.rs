use anyhow::Result;
use hamscope_core::discover_project_root;
use hamscope_providers::ProjectSnapshot;

use crate::args::{BenchmarkCommand, CarbonCommand, Cli, Commands};
use crate::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let project_root = discover_project_root(cli.project_root.as_deref())?;
    let snapshot = ProjectSnapshot::load(&project_root);

    for warning in &snapshot.warnings {
        eprintln!(
            "Warning: skipped {}: {}",
            warning.file.display(),
            warning.reason
        );
    }

    let days = cli.days;
    match cli.command {
        Commands::Stats => handlers::stats::handle(&snapshot, days),
        Commands::Daily => handlers::daily::handle(&snapshot, days),
        Commands::Directories => handlers::directories::handle(&snapshot, days),
        Commands::Sessions { limit } => handlers::sessions::handle(&snapshot, days, limit),
        Commands::Health => handlers::health::handle(&snapshot),
        Commands::Carbon { command } => match command {
            CarbonCommand::Summary => handlers::carbon::summary(&snapshot, days),
            CarbonCommand::Daily => handlers::carbon::daily(&snapshot, days),
            CarbonCommand::Sessions => handlers::carbon::sessions(&snapshot, days),
            CarbonCommand::Files => handlers::carbon::files(&snapshot, days),
        },
        Commands::Benchmark { command } => match command {
            BenchmarkCommand::Summary => handlers::benchmark::summary(&snapshot, days),
            BenchmarkCommand::Compare => handlers::benchmark::compare(&snapshot, days),
            BenchmarkCommand::Recent { limit } => {
                handlers::benchmark::recent(&snapshot, days, limit)
            }
            BenchmarkCommand::Status => handlers::benchmark::status(&snapshot),
        },
        Commands::Insights { structured } => {
            handlers::insights::handle(&snapshot, days, structured)
        }
    }
}
