//! On-disk fixtures: transcript logs, task-event logs, and project trees.

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a transcript JSONL file into the encoded project directory under
/// `log_root`, creating it as the agent would.
pub fn write_transcript(
    log_root: &Path,
    project_root: &Path,
    file_name: &str,
    lines: &[String],
) -> Result<PathBuf> {
    let dir = log_root.join(hamscope_core::encode_project_dir(project_root));
    fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    fs::write(&path, lines.join("\n"))?;
    Ok(path)
}

/// One assistant record with a usage block and a Read tool call per path.
pub fn assistant_line(
    session_id: &str,
    timestamp: &str,
    model: &str,
    input_tokens: u64,
    output_tokens: u64,
    reads: &[&str],
) -> String {
    let content: Vec<serde_json::Value> = reads
        .iter()
        .map(|fp| json!({"type": "tool_use", "id": "t", "name": "Read", "input": {"file_path": fp}}))
        .collect();
    json!({
        "sessionId": session_id,
        "timestamp": timestamp,
        "message": {
            "role": "assistant",
            "model": model,
            "usage": {
                "input_tokens": input_tokens,
                "output_tokens": output_tokens,
                "cache_read_input_tokens": 0,
                "cache_creation_input_tokens": 0
            },
            "content": content
        }
    })
    .to_string()
}

/// One user record with plain string content.
pub fn user_line(session_id: &str, timestamp: &str, text: &str) -> String {
    json!({
        "sessionId": session_id,
        "timestamp": timestamp,
        "message": {"role": "user", "content": text}
    })
    .to_string()
}

/// One `task_start` record for a task-event log.
pub fn task_start_line(
    id: &str,
    timestamp: &str,
    scoping_active: bool,
    model: &str,
    estimated_tokens: u64,
) -> String {
    json!({
        "type": "task_start",
        "id": id,
        "timestamp": timestamp,
        "description": format!("task {id}"),
        "ham_active": scoping_active,
        "model": model,
        "files_read": 2,
        "memory_files_loaded": 1,
        "estimated_tokens": estimated_tokens
    })
    .to_string()
}

/// One `task_end` record for a task-event log.
pub fn task_end_line(id: &str, timestamp: &str) -> String {
    json!({
        "type": "task_end",
        "id": id,
        "timestamp": timestamp,
        "status": "completed"
    })
    .to_string()
}

/// Write a task-event log under the project's `.ham/metrics` directory.
pub fn write_task_log(project_root: &Path, file_name: &str, lines: &[String]) -> Result<PathBuf> {
    let dir = hamscope_core::metrics_dir(project_root);
    fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    fs::write(&path, lines.join("\n"))?;
    Ok(path)
}

/// Builder for an on-disk project tree with source files and context files.
pub struct ProjectTree {
    root: PathBuf,
}

impl ProjectTree {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a directory (relative to the root) containing one source file.
    pub fn source_dir(&self, rel: &str, file_name: &str) -> Result<&Self> {
        let dir = self.join(rel);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file_name), "// sample\n")?;
        Ok(self)
    }

    /// Create a directory containing only non-source files.
    pub fn plain_dir(&self, rel: &str, file_name: &str) -> Result<&Self> {
        let dir = self.join(rel);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file_name), "notes\n")?;
        Ok(self)
    }

    /// Write a context file into a directory (relative to the root).
    pub fn context_file(&self, rel: &str, content: &str) -> Result<&Self> {
        let dir = self.join(rel);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(hamscope_types::CONTEXT_FILE_NAME), content)?;
        Ok(self)
    }

    /// Absolute path for a project-relative path.
    pub fn join(&self, rel: &str) -> PathBuf {
        if rel == "." {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }
}
