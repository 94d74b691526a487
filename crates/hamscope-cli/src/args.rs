use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hamscope")]
#[command(about = "Parse agent session logs and print usage, health, carbon, and benchmark aggregates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project root; defaults to HAMSCOPE_PROJECT_ROOT or the current directory
    #[arg(long, global = true)]
    pub project_root: Option<String>,

    /// Lookback window in days
    #[arg(long, default_value = "30", global = true)]
    pub days: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Aggregate usage statistics for the window")]
    Stats,

    #[command(about = "Per-day usage breakdown (zero-filled)")]
    Daily,

    #[command(about = "Per-directory usage breakdown")]
    Directories,

    #[command(about = "List parsed sessions, newest first")]
    Sessions {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    #[command(about = "Context-file coverage health per source directory")]
    Health,

    #[command(about = "Energy and CO2e estimates")]
    Carbon {
        #[command(subcommand)]
        command: CarbonCommand,
    },

    #[command(about = "Baseline-vs-active benchmark aggregates")]
    Benchmark {
        #[command(subcommand)]
        command: BenchmarkCommand,
    },

    #[command(about = "Rule-based advisories over the other aggregates")]
    Insights {
        /// Emit categorized JSON instead of prose
        #[arg(long)]
        structured: bool,
    },
}

#[derive(Subcommand)]
pub enum CarbonCommand {
    #[command(about = "Window totals: actual vs naive-baseline energy")]
    Summary,

    #[command(about = "Per-day savings breakdown (zero-filled)")]
    Daily,

    #[command(about = "Per-session estimates for the latest sessions")]
    Sessions,

    #[command(about = "Per-context-file load frequency and split advice")]
    Files,
}

#[derive(Subcommand)]
pub enum BenchmarkCommand {
    #[command(about = "Averages across both task logs, split by mode")]
    Summary,

    #[command(about = "Baseline-vs-active deltas with per-model breakdown")]
    Compare,

    #[command(about = "Most recent tasks with correlated token counts")]
    Recent {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    #[command(about = "Persisted benchmarking mode and progress")]
    Status,
}
