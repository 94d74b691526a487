//! Parametric energy and CO2e estimation for sessions, following the
//! EcoLogits methodology: per-token GPU energy as a linear function of
//! active parameter count, plus prefill and server-overhead terms, scaled
//! by datacenter PUE and a fixed grid carbon intensity.
//!
//! The "baseline" counterpart models a naive agent that loads every context
//! file in the project on every request.

use chrono::{DateTime, Duration, Utc};
use hamscope_types::{
    CONTEXT_FILE_NAME, HealthEntry, Session, date_key, estimate_tokens, round1, round2,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::window::filter_by_days;

/// GPU energy per token per billion active parameters (Wh).
const ALPHA: f64 = 8.91e-5;
/// GPU energy per token intercept (Wh).
const BETA: f64 = 1.43e-3;
/// Datacenter power usage effectiveness.
const PUE: f64 = 1.2;
/// Grid carbon intensity, kgCO2 per kWh (US average).
const CARBON_INTENSITY: f64 = 0.385;
/// Prefill-to-decode speed ratio.
const PP_TG_RATIO: f64 = 30.0;
/// Non-GPU server power draw in watts, for a full 8-GPU host.
const SERVER_POWER_W: f64 = 1000.0;

/// (active params in billions, GPUs, generation speed tokens/sec).
struct ModelEnergyProfile {
    active_params: f64,
    gpus: f64,
    gen_speed: f64,
}

const DEFAULT_PROFILE: ModelEnergyProfile = ModelEnergyProfile {
    active_params: 70.0,
    gpus: 2.0,
    gen_speed: 50.0,
};

fn profile_for(model: Option<&str>) -> ModelEnergyProfile {
    match model {
        Some("claude-opus-4-1") => ModelEnergyProfile {
            active_params: 60.0,
            gpus: 4.0,
            gen_speed: 30.0,
        },
        Some("claude-haiku-4-5") | Some("claude-3-5-haiku-20241022") => ModelEnergyProfile {
            active_params: 20.0,
            gpus: 1.0,
            gen_speed: 100.0,
        },
        _ => DEFAULT_PROFILE,
    }
}

/// Energy and emissions estimate for one (input, output, model) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub energy_wh: f64,
    pub co2e_grams: f64,
}

/// Pure and deterministic; unrecognized models use the default profile.
pub fn estimate_energy(input_tokens: u64, output_tokens: u64, model: Option<&str>) -> EnergyEstimate {
    let p = profile_for(model);
    let per_token = ALPHA * p.active_params + BETA;

    let e_gpu = output_tokens as f64 * per_token;
    let e_prefill = input_tokens as f64 * per_token / PP_TG_RATIO;
    let e_server = (output_tokens as f64 / p.gen_speed) * (SERVER_POWER_W / 3600.0) * (p.gpus / 8.0);
    let energy_wh = (e_gpu + e_prefill + e_server) * PUE;

    EnergyEstimate {
        energy_wh,
        // Wh x kgCO2/kWh gives grams directly.
        co2e_grams: energy_wh * CARBON_INTENSITY,
    }
}

/// Token cost of loading every context file in the project once.
pub fn naive_baseline_tokens(health: &[HealthEntry]) -> u64 {
    let total_bytes: u64 = health
        .iter()
        .filter(|e| e.has_context_file && e.file_size > 0)
        .map(|e| e.file_size)
        .sum();
    estimate_tokens(total_bytes)
}

#[derive(Debug, Clone, Serialize)]
pub struct EnergyTotals {
    pub actual_wh: f64,
    pub baseline_wh: f64,
    pub saved_wh: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Co2Totals {
    pub actual_grams: f64,
    pub baseline_grams: f64,
    pub saved_grams: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSummary {
    pub days: u32,
    pub total_sessions: usize,
    pub total_requests: usize,
    /// Input-token reduction vs the naive baseline, percent, one decimal.
    pub token_efficiency: f64,
    pub total_energy: EnergyTotals,
    #[serde(rename = "totalCO2e")]
    pub total_co2e: Co2Totals,
    pub naive_baseline_tokens: u64,
    pub tracking_since: Option<DateTime<Utc>>,
}

pub fn calculate_carbon(sessions: &[Session], days: u32, health: &[HealthEntry]) -> CarbonSummary {
    let filtered = filter_by_days(sessions, days);
    let baseline_tokens = naive_baseline_tokens(health);

    let mut actual_energy = 0.0;
    let mut baseline_energy = 0.0;
    let mut actual_co2e = 0.0;
    let mut baseline_co2e = 0.0;
    let mut total_requests = 0usize;
    let mut actual_input = 0u64;
    let mut baseline_input = 0u64;

    for s in &filtered {
        let prompts = s.message_count.max(1);
        total_requests += prompts;

        let actual = estimate_energy(s.input_tokens, s.output_tokens, s.model.as_deref());
        actual_energy += actual.energy_wh;
        actual_co2e += actual.co2e_grams;
        actual_input += s.input_tokens;

        let session_baseline_input = baseline_tokens * prompts as u64;
        baseline_input += session_baseline_input;
        let baseline = estimate_energy(session_baseline_input, s.output_tokens, s.model.as_deref());
        baseline_energy += baseline.energy_wh;
        baseline_co2e += baseline.co2e_grams;
    }

    let token_efficiency = if baseline_input > 0 {
        round1((1.0 - actual_input as f64 / baseline_input as f64) * 100.0)
    } else {
        0.0
    };

    CarbonSummary {
        days,
        total_sessions: filtered.len(),
        total_requests,
        token_efficiency,
        total_energy: EnergyTotals {
            actual_wh: round2(actual_energy),
            baseline_wh: round2(baseline_energy),
            saved_wh: round2(baseline_energy - actual_energy),
        },
        total_co2e: Co2Totals {
            actual_grams: round2(actual_co2e),
            baseline_grams: round2(baseline_co2e),
            saved_grams: round2(baseline_co2e - actual_co2e),
        },
        naive_baseline_tokens: baseline_tokens,
        tracking_since: filtered.iter().filter_map(|s| s.start_time).min(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CarbonDay {
    pub date: String,
    pub sessions: usize,
    pub prompts: usize,
    pub co2e_saved_grams: f64,
    pub tokens_saved: u64,
}

impl CarbonDay {
    fn empty(date: String) -> Self {
        Self {
            date,
            sessions: 0,
            prompts: 0,
            co2e_saved_grams: 0.0,
            tokens_saved: 0,
        }
    }
}

pub fn calculate_carbon_daily(
    sessions: &[Session],
    days: u32,
    health: &[HealthEntry],
) -> Vec<CarbonDay> {
    let filtered = filter_by_days(sessions, days);
    let baseline_tokens = naive_baseline_tokens(health);
    let mut by_date: HashMap<String, CarbonDay> = HashMap::new();

    for s in &filtered {
        let Some(start) = s.start_time else {
            continue;
        };
        let key = date_key(start);
        let day = by_date
            .entry(key.clone())
            .or_insert_with(|| CarbonDay::empty(key));
        let prompts = s.message_count.max(1);
        day.sessions += 1;
        day.prompts += prompts;

        let actual = estimate_energy(s.input_tokens, s.output_tokens, s.model.as_deref());
        let baseline_input = baseline_tokens * prompts as u64;
        let baseline = estimate_energy(baseline_input, s.output_tokens, s.model.as_deref());

        day.co2e_saved_grams += baseline.co2e_grams - actual.co2e_grams;
        day.tokens_saved += baseline_input.saturating_sub(s.input_tokens);
    }

    let now = Utc::now();
    let mut result = Vec::with_capacity(days as usize);
    for i in (0..days as i64).rev() {
        let key = date_key(now - Duration::days(i));
        let mut day = by_date.remove(&key).unwrap_or_else(|| CarbonDay::empty(key));
        day.co2e_saved_grams = round2(day.co2e_saved_grams);
        result.push(day);
    }
    result
}

/// One context-file load observed in a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileLoad {
    pub path: String,
    /// Estimated from the matching health entry's size; 0 when unmatched.
    pub tokens: u64,
    pub load_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSession {
    pub session_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_ms: i64,
    pub model: Option<String>,
    pub prompts: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub baseline_tokens: u64,
    pub token_savings_percent: f64,
    #[serde(rename = "energy_wh")]
    pub energy_wh: f64,
    #[serde(rename = "baseline_energy_wh")]
    pub baseline_energy_wh: f64,
    #[serde(rename = "saved_wh")]
    pub saved_wh: f64,
    #[serde(rename = "co2e_grams")]
    pub co2e_grams: f64,
    #[serde(rename = "baseline_co2e_grams")]
    pub baseline_co2e_grams: f64,
    #[serde(rename = "saved_grams")]
    pub saved_grams: f64,
    pub files_loaded: Vec<FileLoad>,
}

/// Latest sessions (the input batch is newest-first) with per-session
/// actual-vs-baseline figures.
pub fn calculate_carbon_sessions(
    sessions: &[Session],
    days: u32,
    project_root: &Path,
    health: &[HealthEntry],
) -> Vec<CarbonSession> {
    let filtered = filter_by_days(sessions, days);
    let baseline_tokens = naive_baseline_tokens(health);
    let sizes = context_file_sizes(project_root, health);

    filtered
        .iter()
        .take(20)
        .map(|s| {
            let prompts = s.message_count.max(1);
            let session_baseline = baseline_tokens * prompts as u64;
            let token_savings_percent = if session_baseline > 0 {
                round1((1.0 - s.input_tokens as f64 / session_baseline as f64) * 100.0)
            } else {
                0.0
            };

            let actual = estimate_energy(s.input_tokens, s.output_tokens, s.model.as_deref());
            let baseline = estimate_energy(session_baseline, s.output_tokens, s.model.as_deref());

            let mut loads: Vec<FileLoad> = Vec::new();
            for fp in &s.context_reads {
                match loads.iter_mut().find(|l| Path::new(&l.path) == fp) {
                    Some(load) => load.load_count += 1,
                    None => loads.push(FileLoad {
                        path: fp.to_string_lossy().into_owned(),
                        tokens: sizes.get(fp).copied().map(estimate_tokens).unwrap_or(0),
                        load_count: 1,
                    }),
                }
            }

            CarbonSession {
                session_id: s.session_id.clone(),
                start_time: s.start_time,
                duration_ms: s.duration_ms,
                model: s.model.clone(),
                prompts,
                input_tokens: s.input_tokens,
                output_tokens: s.output_tokens,
                baseline_tokens: session_baseline,
                token_savings_percent,
                energy_wh: round2(actual.energy_wh),
                baseline_energy_wh: round2(baseline.energy_wh),
                saved_wh: round2(baseline.energy_wh - actual.energy_wh),
                co2e_grams: round2(actual.co2e_grams),
                baseline_co2e_grams: round2(baseline.co2e_grams),
                saved_grams: round2(baseline.co2e_grams - actual.co2e_grams),
                files_loaded: loads,
            }
        })
        .collect()
}

/// Actionability classification for one context file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ok,
    ConsiderSplitting,
    SplitThis,
    Stale,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonFileStat {
    pub path: String,
    pub tokens: u64,
    #[serde(rename = "loads7d")]
    pub loads_7d: usize,
    pub loads_per_day: f64,
    pub status: FileStatus,
}

/// Per-context-file load frequency and split/staleness advice.
pub fn calculate_carbon_files(
    sessions: &[Session],
    days: u32,
    project_root: &Path,
    health: &[HealthEntry],
) -> Vec<CarbonFileStat> {
    let filtered = filter_by_days(sessions, days);
    let week_ago = Utc::now() - Duration::days(7);
    let fortnight_ago = Utc::now() - Duration::days(14);

    // Load counts per resolved context-file path over the last 7 days.
    let mut load_counts: HashMap<PathBuf, usize> = HashMap::new();
    let mut loaded_recently: HashMap<PathBuf, bool> = HashMap::new();
    for s in &filtered {
        let Some(start) = s.start_time else {
            continue;
        };
        for fp in &s.context_reads {
            if start >= week_ago {
                *load_counts.entry(fp.clone()).or_insert(0) += 1;
            }
            if start >= fortnight_ago {
                loaded_recently.insert(fp.clone(), true);
            }
        }
    }

    let mut stats: Vec<CarbonFileStat> = health
        .iter()
        .filter(|e| e.has_context_file)
        .map(|e| {
            let context_path = resolve_context_path(project_root, &e.path);
            let tokens = estimate_tokens(e.file_size);
            let loads_7d = load_counts.get(&context_path).copied().unwrap_or(0);
            let loads_per_day = round1(loads_7d as f64 / 7.0);
            let recently = loaded_recently.get(&context_path).copied().unwrap_or(false);

            CarbonFileStat {
                path: e.path.clone(),
                tokens,
                loads_7d,
                loads_per_day,
                status: derive_file_status(tokens, loads_per_day, loads_7d, recently),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.loads_7d.cmp(&a.loads_7d).then_with(|| a.path.cmp(&b.path)));
    stats
}

fn derive_file_status(
    tokens: u64,
    loads_per_day: f64,
    loads_7d: usize,
    loaded_within_14d: bool,
) -> FileStatus {
    if !loaded_within_14d && loads_7d == 0 {
        return FileStatus::Stale;
    }
    if tokens as f64 * loads_per_day > 10_000.0 {
        return FileStatus::SplitThis;
    }
    if tokens > 200 && loads_per_day > 10.0 {
        return FileStatus::ConsiderSplitting;
    }
    FileStatus::Ok
}

/// Absolute path of a health entry's context file.
fn resolve_context_path(project_root: &Path, rel_dir: &str) -> PathBuf {
    if rel_dir == "." {
        project_root.join(CONTEXT_FILE_NAME)
    } else {
        project_root.join(rel_dir).join(CONTEXT_FILE_NAME)
    }
}

/// Byte size of each context file, keyed by its absolute path.
fn context_file_sizes(project_root: &Path, health: &[HealthEntry]) -> HashMap<PathBuf, u64> {
    health
        .iter()
        .filter(|e| e.has_context_file)
        .map(|e| (resolve_context_path(project_root, &e.path), e.file_size))
        .collect()
}
