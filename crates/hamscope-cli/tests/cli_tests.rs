use assert_cmd::Command;
use chrono::{Duration, Utc};
use hamscope_testing::{assistant_line, user_line, write_transcript};
use predicates::prelude::*;
use tempfile::TempDir;

fn hamscope() -> Command {
    Command::cargo_bin("hamscope").unwrap()
}

#[test]
fn help_lists_subcommands() {
    hamscope()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("insights"));
}

#[test]
fn stats_on_empty_project_prints_zeroed_json() {
    let project = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();

    hamscope()
        .env("HAMSCOPE_LOG_ROOT", logs.path())
        .arg("--project-root")
        .arg(project.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalSessions\": 0"));
}

#[test]
fn stats_counts_a_recorded_session() {
    let project = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();

    let start = Utc::now() - Duration::minutes(30);
    let end = start + Duration::minutes(5);
    let read = project.path().join("src/main.rs");
    write_transcript(
        logs.path(),
        project.path(),
        "s1.jsonl",
        &[
            user_line("s1", &start.to_rfc3339(), "hello"),
            assistant_line(
                "s1",
                &end.to_rfc3339(),
                "claude-sonnet-4-5",
                1200,
                300,
                &[read.to_str().unwrap()],
            ),
        ],
    )
    .unwrap();

    hamscope()
        .env("HAMSCOPE_LOG_ROOT", logs.path())
        .arg("--project-root")
        .arg(project.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalSessions\": 1"))
        .stdout(predicate::str::contains("\"totalInputTokens\": 1200"))
        .stdout(predicate::str::contains("\"totalOutputTokens\": 300"));
}

#[test]
fn benchmark_status_defaults_to_mode_none() {
    let project = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();

    hamscope()
        .env("HAMSCOPE_LOG_ROOT", logs.path())
        .arg("--project-root")
        .arg(project.path())
        .arg("benchmark")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"none\""));
}

#[test]
fn insights_on_empty_project_explains_no_sessions() {
    let project = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();

    hamscope()
        .env("HAMSCOPE_LOG_ROOT", logs.path())
        .arg("--project-root")
        .arg(project.path())
        .arg("insights")
        .assert()
        .success()
        .stdout(predicate::str::contains("No agent sessions"));
}
