// Engine module - pure aggregation over parsed sessions, tasks, and health
// entries. No I/O happens here; the CLI layer loads a snapshot and calls in.

pub mod benchmark;
pub mod breakdown;
pub mod carbon;
pub mod insights;
pub mod metrics;
pub mod window;

pub use benchmark::{
    BenchmarkComparison, BenchmarkSummary, RecentTask, calculate_comparison, calculate_summary,
    recent_tasks,
};
pub use breakdown::{DailyBucket, DirectoryBucket, calculate_daily, calculate_directories};
pub use carbon::{
    CarbonFileStat, CarbonSession, CarbonSummary, EnergyEstimate, calculate_carbon,
    calculate_carbon_daily, calculate_carbon_files, calculate_carbon_sessions, estimate_energy,
};
pub use insights::{
    InsightItem, InsightReport, StructuredInsights, generate_insights,
    generate_structured_insights,
};
pub use metrics::{UsageStats, calculate_stats};
pub use window::filter_by_days;
