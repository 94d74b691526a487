//! Rule-based insight synthesis over the other aggregators' outputs.
//!
//! Every threshold here is a fixed literal; the generator is a pure
//! function of its inputs plus the generation timestamp.

use chrono::{DateTime, Utc};
use hamscope_types::{HealthEntry, HealthStatus, format_tokens};
use serde::Serialize;
use serde_json::json;

use crate::breakdown::DailyBucket;
use crate::metrics::UsageStats;

/// Human-readable report: a headline plus supporting observations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub summary: String,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    HamAdoption,
    ContextRouting,
    CoverageGap,
    StaleContext,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Action,
    Observation,
    Positive,
}

/// One machine-readable advisory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightItem {
    pub category: InsightCategory,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub detail: String,
    pub action: Option<String>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredInsights {
    pub generated_at: DateTime<Utc>,
    pub days: u32,
    pub total_sessions: usize,
    pub items: Vec<InsightItem>,
}

pub fn generate_insights(
    stats: &UsageStats,
    health: &[HealthEntry],
    daily: &[DailyBucket],
    days: u32,
) -> InsightReport {
    let mut insights: Vec<String> = Vec::new();

    if stats.total_sessions == 0 {
        return InsightReport {
            summary: format!("No agent sessions found for this project in the last {days} days."),
            insights: vec![
                "Start an agent session in this project to begin tracking usage.".to_string(),
            ],
        };
    }

    if stats.total_sessions == 1 {
        insights.push(format!(
            "One session in the last {days} days, {} input tokens, ${:.2} spent.",
            format_tokens(stats.total_input_tokens),
            stats.total_cost,
        ));
    } else {
        let avg = stats.total_input_tokens / stats.total_sessions as u64;
        insights.push(format!(
            "{} sessions over {days} days, averaging {} tokens each. Total spend: ${:.2}.",
            stats.total_sessions,
            format_tokens(avg),
            stats.total_cost,
        ));
    }

    if stats.scoped_count == 0 {
        insights.push(
            "No sessions are using HAM yet. The agent is reloading broad context on every \
             task. Run \"go ham\" to set up scoped context files and savings start here."
                .to_string(),
        );
    } else if stats.coverage_percent < 50 {
        insights.push(format!(
            "HAM is active in {}% of sessions ({} of {}). Adding CLAUDE.md files to your \
             active directories lets the agent load only the context it needs.",
            stats.coverage_percent, stats.scoped_count, stats.total_sessions,
        ));
    } else if stats.coverage_percent >= 80 {
        insights.push(format!(
            "{}% of sessions are using HAM, saving an estimated {} tokens (${:.2}).",
            stats.coverage_percent,
            format_tokens(stats.total_tokens_saved),
            stats.total_cost_saved,
        ));
    } else {
        insights.push(format!(
            "HAM is active in {}% of sessions, saving an estimated {} tokens (${:.2}). \
             Wider CLAUDE.md coverage means less time spent re-reading code.",
            stats.coverage_percent,
            format_tokens(stats.total_tokens_saved),
            stats.total_cost_saved,
        ));
    }

    let routed_total = stats.routed_count + stats.likely_routed_count;
    if routed_total == 0 {
        insights.push(
            "No sessions are using Context Routing yet. Add a routing section to your root \
             CLAUDE.md (run \"ham route\") so the agent jumps straight to the right context."
                .to_string(),
        );
    } else if stats.routed_percent >= 70 {
        insights.push(format!(
            "{}% of sessions follow Context Routing straight to the relevant sub-context.",
            stats.routed_percent,
        ));
    } else {
        insights.push(format!(
            "{}% of sessions follow Context Routing. More routes means less time scanning \
             the tree for context.",
            stats.routed_percent,
        ));
    }

    if stats.total_cache_read > 0 {
        let cache_pct = ((stats.total_cache_read as f64
            / (stats.total_input_tokens + stats.total_cache_read) as f64)
            * 100.0)
            .round() as u32;
        if cache_pct > 70 {
            insights.push(format!(
                "Cache hit rate is {cache_pct}%: {} tokens served from cache instead of \
                 re-reading files.",
                format_tokens(stats.total_cache_read),
            ));
        } else if cache_pct > 30 {
            insights.push(format!(
                "{cache_pct}% of tokens come from cache ({} tokens). Longer sessions push \
                 this number up.",
                format_tokens(stats.total_cache_read),
            ));
        }
    }

    if days >= 7 {
        let active_days = active_days_last_week(daily);
        if active_days == 0 {
            insights.push("No activity in the last 7 days.".to_string());
        } else if active_days >= 5 {
            insights.push(format!(
                "Active {active_days} of the last 7 days. Consistent use keeps cached \
                 context warm.",
            ));
        }
    }

    let red: Vec<&HealthEntry> = by_status(health, HealthStatus::Red);
    let amber: Vec<&HealthEntry> = by_status(health, HealthStatus::Amber);
    let green: Vec<&HealthEntry> = by_status(health, HealthStatus::Green);

    if !red.is_empty() && red.len() <= 5 {
        let names: Vec<&str> = red.iter().take(3).map(|h| h.path.as_str()).collect();
        let extra = if red.len() > 3 {
            format!(" and {} more", red.len() - 3)
        } else {
            String::new()
        };
        insights.push(format!(
            "{} directories are missing CLAUDE.md files: {}{extra}. The agent has to \
             rediscover these every time it works there.",
            red.len(),
            names.join(", "),
        ));
    } else if red.len() > 5 {
        insights.push(format!(
            "{} directories are missing CLAUDE.md files. Run \"go ham\" to generate \
             context files across the project.",
            red.len(),
        ));
    }

    if !amber.is_empty() {
        let plural = if amber.len() > 1 { "s" } else { "" };
        insights.push(format!(
            "{} context file{plural} may be stale. Worth a quick review so the agent is \
             not following outdated directions.",
            amber.len(),
        ));
    }

    if !green.is_empty() && red.is_empty() && amber.is_empty() {
        insights.push(format!(
            "All {} source directories have up-to-date CLAUDE.md files. Full coverage.",
            green.len(),
        ));
    }

    let summary = insights.first().cloned().unwrap_or_default();
    InsightReport {
        summary,
        insights: insights.into_iter().skip(1).collect(),
    }
}

pub fn generate_structured_insights(
    stats: &UsageStats,
    health: &[HealthEntry],
    daily: &[DailyBucket],
    days: u32,
) -> StructuredInsights {
    let mut items: Vec<InsightItem> = Vec::new();

    if stats.total_sessions > 0 {
        items.push(adoption_item(stats));
        items.push(routing_item(stats));
    }

    let red: Vec<&HealthEntry> = by_status(health, HealthStatus::Red);
    if !red.is_empty() {
        let names: Vec<&str> = red.iter().take(5).map(|h| h.path.as_str()).collect();
        let extra = if red.len() > 5 {
            format!(" and {} more", red.len() - 5)
        } else {
            String::new()
        };
        items.push(InsightItem {
            category: InsightCategory::CoverageGap,
            severity: if red.len() > 5 {
                Severity::High
            } else if red.len() > 2 {
                Severity::Medium
            } else {
                Severity::Low
            },
            kind: InsightKind::Action,
            title: format!("{} directories missing CLAUDE.md", red.len()),
            detail: format!(
                "Directories without context files: {}{extra}.",
                names.join(", ")
            ),
            action: Some(
                "Run \"go ham\" to generate context files, or create them manually.".to_string(),
            ),
            data: json!({
                "count": red.len(),
                "directories": red.iter().map(|h| h.path.as_str()).collect::<Vec<_>>(),
            }),
        });
    }

    let amber: Vec<&HealthEntry> = by_status(health, HealthStatus::Amber);
    if !amber.is_empty() {
        let plural = if amber.len() > 1 { "s" } else { "" };
        items.push(InsightItem {
            category: InsightCategory::StaleContext,
            severity: Severity::Medium,
            kind: InsightKind::Action,
            title: format!("{} context file{plural} may be stale", amber.len()),
            detail: format!(
                "Potentially outdated CLAUDE.md files: {}.",
                amber
                    .iter()
                    .map(|h| h.path.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            action: Some("Review these files to ensure they reflect current code.".to_string()),
            data: json!({
                "count": amber.len(),
                "directories": amber.iter().map(|h| h.path.as_str()).collect::<Vec<_>>(),
            }),
        });
    }

    if days >= 7 {
        let active_days = active_days_last_week(daily);
        if active_days == 0 {
            items.push(InsightItem {
                category: InsightCategory::Activity,
                severity: Severity::Low,
                kind: InsightKind::Observation,
                title: "No activity in the last 7 days".to_string(),
                detail: "No agent sessions recorded in the past week.".to_string(),
                action: None,
                data: json!({ "activeDays": 0, "windowDays": 7 }),
            });
        } else if active_days >= 5 {
            items.push(InsightItem {
                category: InsightCategory::Activity,
                severity: Severity::Low,
                kind: InsightKind::Positive,
                title: "Consistent daily usage".to_string(),
                detail: format!(
                    "Active {active_days} of the last 7 days; consistent use keeps cached \
                     context warm."
                ),
                action: None,
                data: json!({ "activeDays": active_days, "windowDays": 7 }),
            });
        }
    }

    StructuredInsights {
        generated_at: Utc::now(),
        days,
        total_sessions: stats.total_sessions,
        items,
    }
}

fn adoption_item(stats: &UsageStats) -> InsightItem {
    let data = json!({
        "scopedCount": stats.scoped_count,
        "totalSessions": stats.total_sessions,
        "coveragePercent": stats.coverage_percent,
        "tokensSaved": stats.total_tokens_saved,
    });
    if stats.scoped_count == 0 {
        InsightItem {
            category: InsightCategory::HamAdoption,
            severity: Severity::High,
            kind: InsightKind::Action,
            title: "No sessions using HAM".to_string(),
            detail: format!("0 of {} sessions have HAM enabled.", stats.total_sessions),
            action: Some("Run \"go ham\" to set up scoped context files.".to_string()),
            data,
        }
    } else if stats.coverage_percent < 50 {
        InsightItem {
            category: InsightCategory::HamAdoption,
            severity: Severity::Medium,
            kind: InsightKind::Action,
            title: "Low HAM adoption".to_string(),
            detail: format!(
                "HAM is active in {}% of sessions ({} of {}).",
                stats.coverage_percent, stats.scoped_count, stats.total_sessions
            ),
            action: Some(
                "Add CLAUDE.md files to active directories to increase coverage.".to_string(),
            ),
            data,
        }
    } else if stats.coverage_percent < 80 {
        InsightItem {
            category: InsightCategory::HamAdoption,
            severity: Severity::Low,
            kind: InsightKind::Observation,
            title: "Moderate HAM adoption".to_string(),
            detail: format!(
                "HAM is active in {}% of sessions, saving ~{} tokens (${:.2}).",
                stats.coverage_percent,
                format_tokens(stats.total_tokens_saved),
                stats.total_cost_saved
            ),
            action: None,
            data,
        }
    } else {
        InsightItem {
            category: InsightCategory::HamAdoption,
            severity: Severity::Low,
            kind: InsightKind::Positive,
            title: "Strong HAM adoption".to_string(),
            detail: format!(
                "{}% of sessions are using HAM, saving ~{} tokens (${:.2}).",
                stats.coverage_percent,
                format_tokens(stats.total_tokens_saved),
                stats.total_cost_saved
            ),
            action: None,
            data,
        }
    }
}

fn routing_item(stats: &UsageStats) -> InsightItem {
    let routed_total = stats.routed_count + stats.likely_routed_count;
    let data = json!({
        "routedCount": routed_total,
        "totalSessions": stats.total_sessions,
        "routedPercent": stats.routed_percent,
    });
    if routed_total == 0 {
        InsightItem {
            category: InsightCategory::ContextRouting,
            severity: Severity::High,
            kind: InsightKind::Action,
            title: "No sessions using Context Routing".to_string(),
            detail: format!(
                "0 of {} sessions follow Context Routing.",
                stats.total_sessions
            ),
            action: Some(
                "Add a routing section to your root CLAUDE.md (run \"ham route\").".to_string(),
            ),
            data,
        }
    } else if stats.routed_percent < 70 {
        InsightItem {
            category: InsightCategory::ContextRouting,
            severity: Severity::Low,
            kind: InsightKind::Observation,
            title: "Partial Context Routing".to_string(),
            detail: format!(
                "{}% of sessions follow Context Routing.",
                stats.routed_percent
            ),
            action: None,
            data,
        }
    } else {
        InsightItem {
            category: InsightCategory::ContextRouting,
            severity: Severity::Low,
            kind: InsightKind::Positive,
            title: "Strong Context Routing".to_string(),
            detail: format!(
                "{}% of sessions follow Context Routing.",
                stats.routed_percent
            ),
            action: None,
            data,
        }
    }
}

fn by_status(health: &[HealthEntry], status: HealthStatus) -> Vec<&HealthEntry> {
    health.iter().filter(|h| h.status == status).collect()
}

fn active_days_last_week(daily: &[DailyBucket]) -> usize {
    let start = daily.len().saturating_sub(7);
    daily[start..].iter().filter(|d| d.sessions > 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::calculate_daily;
    use crate::metrics::calculate_stats;
    use hamscope_testing::SessionBuilder;
    use hamscope_types::RoutingStatus;

    fn entry(path: &str, status: HealthStatus) -> HealthEntry {
        HealthEntry {
            path: path.to_string(),
            has_context_file: status != HealthStatus::Red,
            status,
            last_modified: None,
            file_size: 100,
            sessions_touched: 0,
            covered_by: None,
        }
    }

    #[test]
    fn no_sessions_yields_onboarding_summary() {
        let stats = calculate_stats(&[], 30);
        let report = generate_insights(&stats, &[], &[], 30);
        assert!(report.summary.contains("No agent sessions"));
        assert_eq!(report.insights.len(), 1);
    }

    #[test]
    fn zero_adoption_is_a_high_severity_action() {
        let sessions = vec![SessionBuilder::new("s1").build()];
        let stats = calculate_stats(&sessions, 30);
        let daily = calculate_daily(&sessions, 30);
        let structured = generate_structured_insights(&stats, &[], &daily, 30);
        let adoption = structured
            .items
            .iter()
            .find(|i| i.category == InsightCategory::HamAdoption)
            .unwrap();
        assert_eq!(adoption.severity, Severity::High);
        assert_eq!(adoption.kind, InsightKind::Action);
        assert!(adoption.action.is_some());
    }

    #[test]
    fn strong_adoption_is_positive() {
        let sessions: Vec<_> = (0..5)
            .map(|i| {
                SessionBuilder::new(&format!("s{i}"))
                    .scoping_active(true)
                    .routing(RoutingStatus::Routed)
                    .build()
            })
            .collect();
        let stats = calculate_stats(&sessions, 30);
        let daily = calculate_daily(&sessions, 30);
        let structured = generate_structured_insights(&stats, &[], &daily, 30);

        let adoption = structured
            .items
            .iter()
            .find(|i| i.category == InsightCategory::HamAdoption)
            .unwrap();
        assert_eq!(adoption.kind, InsightKind::Positive);

        let routing = structured
            .items
            .iter()
            .find(|i| i.category == InsightCategory::ContextRouting)
            .unwrap();
        assert_eq!(routing.kind, InsightKind::Positive);
    }

    #[test]
    fn red_directory_count_drives_severity() {
        let sessions = vec![SessionBuilder::new("s1").build()];
        let stats = calculate_stats(&sessions, 30);
        let daily = calculate_daily(&sessions, 30);

        let severity_for = |count: usize| {
            let health: Vec<HealthEntry> = (0..count)
                .map(|i| entry(&format!("dir{i}"), HealthStatus::Red))
                .collect();
            let structured = generate_structured_insights(&stats, &health, &daily, 30);
            structured
                .items
                .iter()
                .find(|i| i.category == InsightCategory::CoverageGap)
                .unwrap()
                .severity
        };

        assert_eq!(severity_for(2), Severity::Low);
        assert_eq!(severity_for(3), Severity::Medium);
        assert_eq!(severity_for(6), Severity::High);
    }

    #[test]
    fn amber_directories_raise_a_medium_action() {
        let sessions = vec![SessionBuilder::new("s1").build()];
        let stats = calculate_stats(&sessions, 30);
        let daily = calculate_daily(&sessions, 30);
        let health = vec![entry("src", HealthStatus::Amber)];
        let structured = generate_structured_insights(&stats, &health, &daily, 30);
        let stale = structured
            .items
            .iter()
            .find(|i| i.category == InsightCategory::StaleContext)
            .unwrap();
        assert_eq!(stale.severity, Severity::Medium);
        assert_eq!(stale.kind, InsightKind::Action);
    }

    #[test]
    fn consistent_activity_is_positive() {
        let sessions: Vec<_> = (0..6)
            .map(|i| SessionBuilder::new(&format!("s{i}")).days_ago(i).build())
            .collect();
        let stats = calculate_stats(&sessions, 30);
        let daily = calculate_daily(&sessions, 30);
        let structured = generate_structured_insights(&stats, &[], &daily, 30);
        let activity = structured
            .items
            .iter()
            .find(|i| i.category == InsightCategory::Activity)
            .unwrap();
        assert_eq!(activity.kind, InsightKind::Positive);
    }

    #[test]
    fn prose_report_covers_health_and_routing() {
        let sessions: Vec<_> = (0..4)
            .map(|i| {
                SessionBuilder::new(&format!("s{i}"))
                    .scoping_active(true)
                    .routing(RoutingStatus::Routed)
                    .build()
            })
            .collect();
        let stats = calculate_stats(&sessions, 30);
        let daily = calculate_daily(&sessions, 30);
        let health = vec![
            entry(".", HealthStatus::Green),
            entry("src", HealthStatus::Green),
        ];
        let report = generate_insights(&stats, &health, &daily, 30);
        assert!(report.summary.contains("4 sessions"));
        assert!(report.insights.iter().any(|i| i.contains("Full coverage")));
        assert!(report.insights.iter().any(|i| i.contains("Context Routing")));
    }
}
