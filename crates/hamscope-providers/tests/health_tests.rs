use hamscope_providers::scan_context_health;
use hamscope_testing::{ProjectTree, SessionBuilder};
use hamscope_types::HealthStatus;
use tempfile::TempDir;

fn entry<'a>(
    entries: &'a [hamscope_types::HealthEntry],
    path: &str,
) -> &'a hamscope_types::HealthEntry {
    entries
        .iter()
        .find(|e| e.path == path)
        .unwrap_or_else(|| panic!("no entry for {path}"))
}

#[test]
fn statuses_across_a_small_tree() {
    let tmp = TempDir::new().unwrap();
    let tree = ProjectTree::new(tmp.path());
    tree.source_dir(".", "main.rs").unwrap();
    tree.context_file(".", "# root\n").unwrap();
    tree.source_dir("src", "lib.rs").unwrap();
    tree.context_file("src", "# src\n").unwrap();
    tree.source_dir("src/api", "routes.rs").unwrap();

    let entries = scan_context_health(tmp.path(), &[]);
    assert_eq!(entries.len(), 3);

    assert_eq!(entry(&entries, ".").status, HealthStatus::Green);
    assert_eq!(entry(&entries, "src").status, HealthStatus::Green);

    // src/api has no context file but src does: demoted red.
    let api = entry(&entries, "src/api");
    assert_eq!(api.status, HealthStatus::Yellow);
    assert_eq!(api.covered_by.as_deref(), Some("src"));
    assert!(!api.has_context_file);
    assert_eq!(api.file_size, entry(&entries, "src").file_size);
}

#[test]
fn uncovered_directory_is_red() {
    let tmp = TempDir::new().unwrap();
    let tree = ProjectTree::new(tmp.path());
    tree.source_dir("lib", "core.py").unwrap();

    let entries = scan_context_health(tmp.path(), &[]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "lib");
    assert_eq!(entries[0].status, HealthStatus::Red);
    assert!(entries[0].covered_by.is_none());
}

#[test]
fn directories_without_source_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let tree = ProjectTree::new(tmp.path());
    tree.source_dir("src", "lib.rs").unwrap();
    tree.plain_dir("docs", "notes.txt").unwrap();
    tree.source_dir("node_modules/pkg", "index.js").unwrap();
    tree.source_dir(".cache", "blob.js").unwrap();

    let entries = scan_context_health(tmp.path(), &[]);
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["src"]);
}

#[test]
fn two_session_touches_turn_green_to_amber() {
    let tmp = TempDir::new().unwrap();
    let tree = ProjectTree::new(tmp.path());
    tree.source_dir("src", "lib.rs").unwrap();
    tree.context_file("src", "# src\n").unwrap();

    let read = tmp.path().join("src/lib.rs").to_string_lossy().into_owned();
    let one = vec![SessionBuilder::new("s1").reads(&[&read]).build()];
    let two = vec![
        SessionBuilder::new("s1").reads(&[&read]).build(),
        // Same file twice within a session still counts once.
        SessionBuilder::new("s2").reads(&[&read, &read]).build(),
    ];

    let entries = scan_context_health(tmp.path(), &one);
    assert_eq!(entry(&entries, "src").status, HealthStatus::Green);
    assert_eq!(entry(&entries, "src").sessions_touched, 1);

    let entries = scan_context_health(tmp.path(), &two);
    assert_eq!(entry(&entries, "src").status, HealthStatus::Amber);
    assert_eq!(entry(&entries, "src").sessions_touched, 2);
}

#[test]
fn output_sorted_by_severity_then_path() {
    let tmp = TempDir::new().unwrap();
    let tree = ProjectTree::new(tmp.path());
    tree.source_dir("green", "a.rs").unwrap();
    tree.context_file("green", "# g\n").unwrap();
    tree.source_dir("red-b", "b.rs").unwrap();
    tree.source_dir("red-a", "c.rs").unwrap();

    let entries = scan_context_health(tmp.path(), &[]);
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["green", "red-a", "red-b"]);
}
