use chrono::{DateTime, Utc};
use std::path::Path;

/// Canonical per-directory context filename consumed by the agent.
pub const CONTEXT_FILE_NAME: &str = "CLAUDE.md";

/// File extensions that mark a directory as containing source code.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "swift", "kt", "dart", "go", "rs", "java", "c", "cpp", "h",
    "rb", "php", "cs", "vue", "svelte",
];

/// Check whether a path has a recognized source-code extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Check whether a path's basename is the canonical context filename.
pub fn is_context_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name == CONTEXT_FILE_NAME)
}

/// Format a timestamp as a YYYY-MM-DD calendar date key (UTC).
pub fn date_key(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Estimate token count from content byte length (~4 bytes per token).
pub fn estimate_tokens(bytes: u64) -> u64 {
    bytes.div_ceil(4)
}

/// Human-readable token count: 1234 -> "1.2K", 2_500_000 -> "2.5M".
pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Round to two decimal places (dollar amounts, seconds, percentages).
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Round to one decimal place.
pub fn round1(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}
