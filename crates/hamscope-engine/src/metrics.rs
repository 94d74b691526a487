//! Windowed usage statistics: token/cost totals, scoping coverage, routing
//! adoption, and the savings estimate against an unscoped baseline.

use hamscope_types::{RoutingStatus, Session, calculate_cost, round2};
use serde::Serialize;

use crate::window::filter_by_days;

/// Minimum unscoped sample before the observed baseline is trusted.
const MIN_UNSCOPED_SAMPLE: usize = 3;
/// Multiplier applied to the scoped average when no unscoped data exists.
const SCOPED_FALLBACK_MULTIPLIER: f64 = 5.0;
/// Conservative tokens-per-read constant when there is no data at all.
const FALLBACK_TOKENS_PER_READ: f64 = 50_000.0;

/// Aggregate statistics for a lookback window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub days: u32,
    pub total_sessions: usize,
    pub scoped_count: usize,
    pub unscoped_count: usize,
    /// Percentage of sessions with scoping active, rounded.
    pub coverage_percent: u32,
    pub routed_count: usize,
    pub likely_routed_count: usize,
    pub unrouted_count: usize,
    /// Percentage of sessions classified routed or likely, rounded.
    pub routed_percent: u32,
    pub total_tokens_saved: u64,
    pub total_cost_saved: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cache_read: u64,
    pub total_cost: f64,
    pub avg_file_reads: u64,
    pub baseline: BaselineEstimate,
}

/// Estimated input tokens a single file read costs without scoping.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEstimate {
    pub avg_tokens_per_read: u64,
    /// Number of sessions the estimate was derived from; 0 for the constant.
    pub sample_size: usize,
}

pub fn calculate_stats(sessions: &[Session], days: u32) -> UsageStats {
    let filtered = filter_by_days(sessions, days);
    let (scoped, unscoped): (Vec<&Session>, Vec<&Session>) =
        filtered.iter().partition(|s| s.scoping_active);

    let (avg_tokens_per_read, sample_size) = estimate_baseline(&scoped, &unscoped);

    let mut total_tokens_saved = 0.0f64;
    let mut total_cost_saved = 0.0f64;
    for s in &scoped {
        let reads = s.non_context_read_count().max(1);
        let expected = reads as f64 * avg_tokens_per_read;
        let saved = (expected - s.input_tokens as f64).max(0.0);
        total_tokens_saved += saved;
        total_cost_saved += calculate_cost(saved as u64, 0, s.model.as_deref());
    }

    let total_sessions = filtered.len();
    let routed_count = count_status(&filtered, RoutingStatus::Routed);
    let likely_routed_count = count_status(&filtered, RoutingStatus::Likely);
    let unrouted_count = count_status(&filtered, RoutingStatus::Unrouted);

    let total_file_reads: usize = filtered.iter().map(|s| s.file_reads.len()).sum();
    let total_cost: f64 = filtered
        .iter()
        .map(|s| calculate_cost(s.input_tokens, s.output_tokens, s.model.as_deref()))
        .sum();

    UsageStats {
        days,
        total_sessions,
        scoped_count: scoped.len(),
        unscoped_count: unscoped.len(),
        coverage_percent: percent(scoped.len(), total_sessions),
        routed_count,
        likely_routed_count,
        unrouted_count,
        routed_percent: percent(routed_count + likely_routed_count, total_sessions),
        total_tokens_saved: total_tokens_saved.round() as u64,
        total_cost_saved: round2(total_cost_saved),
        total_input_tokens: filtered.iter().map(|s| s.input_tokens).sum(),
        total_output_tokens: filtered.iter().map(|s| s.output_tokens).sum(),
        total_cache_read: filtered.iter().map(|s| s.cache_read_tokens).sum(),
        total_cost: round2(total_cost),
        avg_file_reads: if total_sessions > 0 {
            (total_file_reads as f64 / total_sessions as f64).round() as u64
        } else {
            0
        },
        baseline: BaselineEstimate {
            avg_tokens_per_read: avg_tokens_per_read.round() as u64,
            sample_size,
        },
    }
}

/// Tokens-per-read baseline, by preference: observed unscoped mean (needs
/// at least three unscoped sessions and some reads), scoped mean scaled up,
/// then a fixed constant.
fn estimate_baseline(scoped: &[&Session], unscoped: &[&Session]) -> (f64, usize) {
    if unscoped.len() >= MIN_UNSCOPED_SAMPLE
        && let Some(mean) = tokens_per_read(unscoped)
    {
        return (mean, unscoped.len());
    }
    if !scoped.is_empty()
        && let Some(mean) = tokens_per_read(scoped)
    {
        return (mean * SCOPED_FALLBACK_MULTIPLIER, scoped.len());
    }
    (FALLBACK_TOKENS_PER_READ, 0)
}

fn tokens_per_read(sessions: &[&Session]) -> Option<f64> {
    let mut total_tokens = 0u64;
    let mut total_reads = 0usize;
    for s in sessions {
        let reads = s.file_reads.len();
        if reads > 0 {
            total_tokens += s.input_tokens;
            total_reads += reads;
        }
    }
    if total_reads == 0 {
        return None;
    }
    Some(total_tokens as f64 / total_reads as f64)
}

fn count_status(sessions: &[&Session], status: RoutingStatus) -> usize {
    sessions
        .iter()
        .filter(|s| s.routing_status == status)
        .count()
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
