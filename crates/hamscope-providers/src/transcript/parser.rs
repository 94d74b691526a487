//! Single-pass reconstruction of a Session from one transcript file.

use chrono::{DateTime, Utc};
use hamscope_types::{CONTEXT_FILE_NAME, Session, is_context_file};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::schema::{RawRecord, Role};
use crate::routing::{RoutingTable, classify_routing};

/// Parse one transcript file into a Session.
///
/// Streams the file line by line; blank and unparsable lines are skipped
/// silently. Returns `Ok(None)` when no record ever carried a session id.
pub(crate) fn parse_transcript(
    path: &Path,
    project_root: &Path,
    routing: &RoutingTable,
) -> std::io::Result<Option<Session>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut session_id: Option<String> = None;
    let mut model: Option<String> = None;
    let mut timestamps: Vec<DateTime<Utc>> = Vec::new();
    let mut input_tokens = 0u64;
    let mut output_tokens = 0u64;
    let mut cache_read_tokens = 0u64;
    let mut cache_creation_tokens = 0u64;
    let mut file_reads: Vec<PathBuf> = Vec::new();
    let mut context_reads: Vec<PathBuf> = Vec::new();
    let mut scoping_active = false;
    let mut message_count = 0usize;
    let mut tool_call_count = 0usize;

    let root_context = project_root.join(CONTEXT_FILE_NAME);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RawRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(_) => continue,
        };

        if session_id.is_none() {
            session_id = record.session_id.clone();
        }

        let ts = record
            .timestamp
            .as_deref()
            .or(record.message.as_ref().and_then(|m| m.timestamp.as_deref()));
        if let Some(ts) = ts
            && let Ok(parsed) = DateTime::parse_from_rfc3339(ts)
        {
            timestamps.push(parsed.with_timezone(&Utc));
        }

        let Some(msg) = record.message else {
            continue;
        };

        match msg.role() {
            Role::Assistant => {
                message_count += 1;

                if let Some(usage) = msg.usage {
                    input_tokens += usage.input_tokens;
                    output_tokens += usage.output_tokens;
                    cache_read_tokens += usage.cache_read_input_tokens;
                    cache_creation_tokens += usage.cache_creation_input_tokens;
                }

                if model.is_none() {
                    model = msg.model.clone();
                }

                for block in &msg.content {
                    if is_tool_use(block) {
                        tool_call_count += 1;
                    }
                    if let Some(fp) = block.read_file_path() {
                        let fp = PathBuf::from(fp);
                        if is_context_file(&fp) {
                            context_reads.push(fp.clone());
                            // Scoping is active once any non-root context
                            // file inside the project tree has been read.
                            if fp != root_context && fp.starts_with(project_root) {
                                scoping_active = true;
                            }
                        }
                        file_reads.push(fp);
                    }
                }
            }
            Role::User => {
                message_count += 1;
            }
            Role::Other => {}
        }
    }

    let Some(session_id) = session_id else {
        return Ok(None);
    };

    timestamps.sort();
    let start_time = timestamps.first().copied();
    let end_time = timestamps.last().copied();
    let duration_ms = match (start_time, end_time) {
        (Some(start), Some(end)) => (end - start).num_milliseconds(),
        _ => 0,
    };

    let primary_directory = attribute_directory(&file_reads, project_root);
    let routing_status = classify_routing(&context_reads, project_root, routing);

    Ok(Some(Session {
        session_id,
        start_time,
        end_time,
        duration_ms,
        model,
        input_tokens,
        output_tokens,
        cache_read_tokens,
        cache_creation_tokens,
        file_reads,
        context_reads,
        scoping_active,
        routing_status,
        primary_directory,
        message_count,
        tool_call_count,
    }))
}

fn is_tool_use(block: &super::schema::ContentBlock) -> bool {
    matches!(block, super::schema::ContentBlock::ToolUse { .. })
}

/// Project-relative directory with the highest non-context read count.
///
/// Ties resolve to the lexicographically smallest directory so attribution
/// is stable across environments.
fn attribute_directory(file_reads: &[PathBuf], project_root: &Path) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for fp in file_reads {
        if is_context_file(fp) {
            continue;
        }
        let Some(dir) = fp.parent() else {
            continue;
        };
        let Ok(rel) = dir.strip_prefix(project_root) else {
            continue; // outside project
        };
        let key = if rel.as_os_str().is_empty() {
            ".".to_string()
        } else {
            rel.to_string_lossy().into_owned()
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut best: Option<(&String, usize)> = None;
    for (dir, count) in &counts {
        if best.is_none_or(|(_, max)| *count > max) {
            best = Some((dir, *count));
        }
    }
    best.map(|(dir, _)| dir.clone())
}
