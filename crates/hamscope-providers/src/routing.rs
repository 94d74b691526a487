//! Context-routing table extraction and per-session routing classification.
//!
//! The root context file may declare a "Context Routing" section whose
//! arrow-prefixed entries point the agent at sub-context files:
//!
//! ```text
//! ## Context Routing
//! -> api work: src/api/CLAUDE.md
//! -> ui work: src/ui/CLAUDE.md
//! ```
//!
//! The table is extracted once per parse batch and consulted for every
//! session's ordered context-read list.

use hamscope_types::{CONTEXT_FILE_NAME, RoutingStatus};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const ROUTING_SECTION: &str = "context routing";

/// Ordered (label, path) entries from the root context file's routing
/// section. Paths are resolved to absolute paths under the project root.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: Vec<RouteEntry>,
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub label: String,
    pub path: PathBuf,
}

impl RoutingTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }
}

fn route_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Optional list marker, then an arrow, then "label: path".
        Regex::new(r"^\s*(?:[-*]\s*)?(?:→|->)\s*([^:]+?)\s*:\s*(.+?)\s*$").unwrap()
    })
}

/// Extract the routing table from the project's root context file.
///
/// A missing or unreadable root file yields an empty table. Entries are
/// collected from the routing section header until the next section header.
pub fn extract_routing_table(project_root: &Path) -> RoutingTable {
    let root_file = project_root.join(CONTEXT_FILE_NAME);
    let content = match std::fs::read_to_string(&root_file) {
        Ok(c) => c,
        Err(_) => return RoutingTable::default(),
    };
    parse_routing_section(&content, project_root)
}

fn parse_routing_section(content: &str, project_root: &Path) -> RoutingTable {
    let mut entries = Vec::new();
    let mut in_section = false;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            in_section = trimmed
                .trim_start_matches('#')
                .trim()
                .to_lowercase()
                .contains(ROUTING_SECTION);
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(caps) = route_line_regex().captures(line) {
            let label = caps[1].trim().to_string();
            let raw_path = caps[2].trim();
            let path = if Path::new(raw_path).is_absolute() {
                PathBuf::from(raw_path)
            } else {
                project_root.join(raw_path)
            };
            entries.push(RouteEntry { label, path });
        }
    }

    RoutingTable { entries }
}

/// Classify how a session engaged with the routing table.
///
/// Pure function of the ordered context-read list and the table:
/// - empty table, or root context file never read: unrouted
/// - the read right after the root file is a routed path: routed
/// - any later read is a routed path: likely
/// - otherwise: unrouted
pub fn classify_routing(
    context_reads: &[PathBuf],
    project_root: &Path,
    table: &RoutingTable,
) -> RoutingStatus {
    if table.is_empty() {
        return RoutingStatus::Unrouted;
    }

    let root_file = project_root.join(CONTEXT_FILE_NAME);
    let Some(root_idx) = context_reads.iter().position(|p| *p == root_file) else {
        return RoutingStatus::Unrouted;
    };

    if let Some(next) = context_reads.get(root_idx + 1)
        && table.contains(next)
    {
        return RoutingStatus::Routed;
    }

    if context_reads
        .iter()
        .skip(root_idx + 1)
        .any(|p| table.contains(p))
    {
        return RoutingStatus::Likely;
    }

    RoutingStatus::Unrouted
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/proj";

    fn table_from(content: &str) -> RoutingTable {
        parse_routing_section(content, Path::new(ROOT))
    }

    #[test]
    fn extracts_arrow_entries_until_next_header() {
        let content = "\
# My Project

## Context Routing
-> api work: src/api/CLAUDE.md
- → ui work: src/ui/CLAUDE.md
not an entry
## Another Section
-> ignored: src/other/CLAUDE.md
";
        let table = table_from(content);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].label, "api work");
        assert!(table.contains(Path::new("/proj/src/api/CLAUDE.md")));
        assert!(table.contains(Path::new("/proj/src/ui/CLAUDE.md")));
        assert!(!table.contains(Path::new("/proj/src/other/CLAUDE.md")));
    }

    #[test]
    fn no_section_means_empty_table() {
        let table = table_from("# My Project\n\n-> stray: src/CLAUDE.md\n");
        assert!(table.is_empty());
    }

    fn reads(paths: &[&str]) -> Vec<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn empty_table_is_always_unrouted() {
        let status = classify_routing(
            &reads(&["/proj/CLAUDE.md", "/proj/src/api/CLAUDE.md"]),
            Path::new(ROOT),
            &RoutingTable::default(),
        );
        assert_eq!(status, RoutingStatus::Unrouted);
    }

    #[test]
    fn root_never_read_is_unrouted() {
        let table = table_from("## Context Routing\n-> api: src/api/CLAUDE.md\n");
        let status = classify_routing(
            &reads(&["/proj/src/api/CLAUDE.md"]),
            Path::new(ROOT),
            &table,
        );
        assert_eq!(status, RoutingStatus::Unrouted);
    }

    #[test]
    fn immediate_follow_is_routed() {
        let table = table_from("## Context Routing\n-> api: src/api/CLAUDE.md\n");
        let status = classify_routing(
            &reads(&["/proj/CLAUDE.md", "/proj/src/api/CLAUDE.md"]),
            Path::new(ROOT),
            &table,
        );
        assert_eq!(status, RoutingStatus::Routed);
    }

    #[test]
    fn later_follow_is_likely() {
        let table = table_from("## Context Routing\n-> api: src/api/CLAUDE.md\n");
        let status = classify_routing(
            &reads(&[
                "/proj/CLAUDE.md",
                "/proj/docs/CLAUDE.md",
                "/proj/src/api/CLAUDE.md",
            ]),
            Path::new(ROOT),
            &table,
        );
        assert_eq!(status, RoutingStatus::Likely);
    }

    #[test]
    fn no_routed_read_after_root_is_unrouted() {
        let table = table_from("## Context Routing\n-> api: src/api/CLAUDE.md\n");
        let status = classify_routing(
            &reads(&["/proj/CLAUDE.md", "/proj/docs/CLAUDE.md"]),
            Path::new(ROOT),
            &table,
        );
        assert_eq!(status, RoutingStatus::Unrouted);
    }
}
