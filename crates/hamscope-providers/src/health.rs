//! Context-health scan: walk the project tree and classify every source
//! directory's context-file coverage.

use chrono::{DateTime, Utc};
use hamscope_types::{
    CONTEXT_FILE_NAME, HealthEntry, HealthStatus, Session, is_context_file, is_source_file,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use walkdir::WalkDir;

/// Conventional build/dependency directories never worth scanning.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    "__pycache__",
    ".next",
    "target",
    "vendor",
];

/// Traversal predicate: hidden directories are excluded (the root itself is
/// exempt), as is the fixed denylist.
pub fn is_excluded_dir(name: &str, is_root: bool) -> bool {
    if is_root {
        return false;
    }
    (name.starts_with('.') && name != ".") || EXCLUDED_DIRS.contains(&name)
}

/// Walk the project tree and emit a health entry for every directory that
/// contains at least one source file.
///
/// Status derivation: no context file is red; a context file with 2+ session
/// touches is amber; otherwise green. A second pass demotes red entries to
/// yellow when an ancestor (including the root) carries its own context
/// file. The context file's mtime is recorded but deliberately plays no part
/// in the amber threshold. Output is sorted best-first (green before red),
/// path as tie-break.
pub fn scan_context_health(project_root: &Path, sessions: &[Session]) -> Vec<HealthEntry> {
    let touch_counts = build_touch_counts(sessions, project_root);
    let mut entries: Vec<HealthEntry> = Vec::new();

    let walker = WalkDir::new(project_root).into_iter().filter_entry(|e| {
        if !e.file_type().is_dir() {
            return true;
        }
        let name = e.file_name().to_string_lossy();
        !is_excluded_dir(&name, e.depth() == 0)
    });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(health) = inspect_directory(entry.path(), project_root, &touch_counts) {
            entries.push(health);
        }
    }

    demote_covered_reds(&mut entries);

    entries.sort_by(|a, b| {
        a.status
            .severity()
            .cmp(&b.status.severity())
            .then_with(|| a.path.cmp(&b.path))
    });
    entries
}

fn inspect_directory(
    dir: &Path,
    project_root: &Path,
    touch_counts: &HashMap<String, usize>,
) -> Option<HealthEntry> {
    let items = std::fs::read_dir(dir).ok()?;
    let has_source = items
        .filter_map(|i| i.ok())
        .any(|i| i.file_type().is_ok_and(|t| t.is_file()) && is_source_file(&i.path()));
    if !has_source {
        return None;
    }

    let rel = relative_key(dir, project_root)?;

    let context_path = dir.join(CONTEXT_FILE_NAME);
    let mut has_context_file = false;
    let mut last_modified: Option<DateTime<Utc>> = None;
    let mut file_size = 0u64;
    if let Ok(meta) = std::fs::metadata(&context_path) {
        has_context_file = true;
        file_size = meta.len();
        last_modified = meta.modified().ok().map(DateTime::<Utc>::from);
    }

    let sessions_touched = touch_counts.get(&rel).copied().unwrap_or(0);
    let status = derive_status(has_context_file, sessions_touched);

    Some(HealthEntry {
        path: rel,
        has_context_file,
        status,
        last_modified,
        file_size,
        sessions_touched,
        covered_by: None,
    })
}

fn derive_status(has_context_file: bool, touch_count: usize) -> HealthStatus {
    if !has_context_file {
        return HealthStatus::Red;
    }
    if touch_count >= 2 {
        return HealthStatus::Amber;
    }
    HealthStatus::Green
}

/// Red entries whose ancestor carries a context file become yellow and
/// inherit the ancestor's mtime and size for display.
fn demote_covered_reds(entries: &mut [HealthEntry]) {
    let covered: HashSet<String> = entries
        .iter()
        .filter(|e| e.has_context_file)
        .map(|e| e.path.clone())
        .collect();

    let by_path: HashMap<String, (Option<DateTime<Utc>>, u64)> = entries
        .iter()
        .filter(|e| e.has_context_file)
        .map(|e| (e.path.clone(), (e.last_modified, e.file_size)))
        .collect();

    for entry in entries.iter_mut() {
        if entry.status != HealthStatus::Red {
            continue;
        }
        let Some(ancestor) = find_covering_ancestor(&entry.path, &covered) else {
            continue;
        };
        entry.status = HealthStatus::Yellow;
        if let Some((mtime, size)) = by_path.get(&ancestor) {
            entry.last_modified = *mtime;
            entry.file_size = *size;
        }
        entry.covered_by = Some(ancestor);
    }
}

/// Walk up path segments toward the root looking for an ancestor with its
/// own context file. Returns the ancestor's relative path, if any.
fn find_covering_ancestor(rel_path: &str, covered: &HashSet<String>) -> Option<String> {
    if rel_path == "." {
        return None;
    }
    let segments: Vec<&str> = rel_path.split('/').collect();
    for i in (0..segments.len()).rev() {
        let ancestor = if i == 0 {
            ".".to_string()
        } else {
            segments[..i].join("/")
        };
        if covered.contains(&ancestor) {
            return Some(ancestor);
        }
    }
    None
}

/// Map each project-relative directory to the number of distinct sessions
/// that read a non-context file inside it.
fn build_touch_counts(sessions: &[Session], project_root: &Path) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for session in sessions {
        let mut dirs_in_session: HashSet<String> = HashSet::new();
        for fp in &session.file_reads {
            if is_context_file(fp) {
                continue;
            }
            let Some(dir) = fp.parent() else {
                continue;
            };
            if let Some(rel) = relative_key(dir, project_root) {
                dirs_in_session.insert(rel);
            }
        }
        for dir in dirs_in_session {
            *counts.entry(dir).or_insert(0) += 1;
        }
    }

    counts
}

fn relative_key(dir: &Path, project_root: &Path) -> Option<String> {
    let rel = dir.strip_prefix(project_root).ok()?;
    if rel.as_os_str().is_empty() {
        Some(".".to_string())
    } else {
        Some(rel.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_predicate() {
        assert!(!is_excluded_dir(".", true));
        assert!(!is_excluded_dir(".hidden-root", true));
        assert!(is_excluded_dir(".git", false));
        assert!(is_excluded_dir(".hidden", false));
        assert!(is_excluded_dir("node_modules", false));
        assert!(is_excluded_dir("target", false));
        assert!(!is_excluded_dir("src", false));
    }

    #[test]
    fn status_derivation() {
        assert_eq!(derive_status(false, 0), HealthStatus::Red);
        assert_eq!(derive_status(false, 5), HealthStatus::Red);
        assert_eq!(derive_status(true, 0), HealthStatus::Green);
        assert_eq!(derive_status(true, 1), HealthStatus::Green);
        assert_eq!(derive_status(true, 2), HealthStatus::Amber);
    }

    #[test]
    fn covering_ancestor_walks_to_root() {
        let covered: HashSet<String> = [".".to_string(), "src".to_string()].into();
        assert_eq!(
            find_covering_ancestor("src/api", &covered),
            Some("src".to_string())
        );
        assert_eq!(
            find_covering_ancestor("docs/guide", &covered),
            Some(".".to_string())
        );
        assert_eq!(find_covering_ancestor(".", &covered), None);
    }

    #[test]
    fn covering_ancestor_none_without_coverage() {
        let covered: HashSet<String> = HashSet::new();
        assert_eq!(find_covering_ancestor("src/api", &covered), None);
    }
}
