//! Batch parsing of per-project transcript logs.

mod parser;
mod schema;

use hamscope_types::Session;
use std::path::{Path, PathBuf};

use crate::routing::extract_routing_table;

/// A transcript file that could not be parsed, with the reason it was
/// skipped. The rest of the batch is unaffected.
#[derive(Debug, Clone)]
pub struct ParseWarning {
    pub file: PathBuf,
    pub reason: String,
}

/// Result of parsing every transcript found for a project.
#[derive(Debug, Clone, Default)]
pub struct SessionBatch {
    /// Reconstructed sessions, newest first.
    pub sessions: Vec<Session>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse all transcript JSONL files for a project.
///
/// The per-project log directory is derived deterministically from the
/// project root under the agent's default log root. A missing directory is
/// an empty batch, not an error; a failure on one file is recorded as a
/// warning and the rest proceed.
pub fn parse_sessions(project_root: &Path) -> SessionBatch {
    match hamscope_core::default_log_root() {
        Ok(log_root) => parse_sessions_at(&log_root, project_root),
        Err(err) => SessionBatch {
            sessions: Vec::new(),
            warnings: vec![ParseWarning {
                file: project_root.to_path_buf(),
                reason: err.to_string(),
            }],
        },
    }
}

/// Parse all transcript JSONL files for a project under an explicit log
/// root. The routing table is extracted once and shared across all per-file
/// parses.
pub fn parse_sessions_at(log_root: &Path, project_root: &Path) -> SessionBatch {
    let mut batch = SessionBatch::default();
    let log_dir = log_root.join(hamscope_core::encode_project_dir(project_root));

    let entries = match std::fs::read_dir(&log_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return batch;
        }
        Err(err) => {
            batch.warnings.push(ParseWarning {
                file: log_dir,
                reason: err.to_string(),
            });
            return batch;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "jsonl"))
        .collect();
    files.sort();

    let routing = extract_routing_table(project_root);

    for file in files {
        match parser::parse_transcript(&file, project_root, &routing) {
            Ok(Some(session)) => batch.sessions.push(session),
            Ok(None) => {} // no session id anywhere in the file
            Err(err) => batch.warnings.push(ParseWarning {
                file,
                reason: err.to_string(),
            }),
        }
    }

    batch
        .sessions
        .sort_by(|a, b| b.start_time.cmp(&a.start_time));
    batch
}
