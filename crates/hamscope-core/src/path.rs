use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Encode a project root into its transcript directory name.
///
/// The agent's log layout replaces both '/' and '.' with '-', so distinct
/// project roots never collide on disk.
pub fn encode_project_dir(project_root: &Path) -> String {
    let path_str = project_root.to_string_lossy();
    let encoded = path_str
        .replace(['/', '.'], "-")
        .trim_start_matches('-')
        .to_string();
    format!("-{}", encoded)
}

/// Base directory holding every project's transcript directory.
///
/// Defaults to `~/.claude/projects`; `HAMSCOPE_LOG_ROOT` overrides the base
/// for non-standard installs.
pub fn default_log_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("HAMSCOPE_LOG_ROOT") {
        return Ok(expand_tilde(&root));
    }
    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".claude").join("projects"));
    }
    Err(Error::Config(
        "Could not determine transcript directory: no home directory found".to_string(),
    ))
}

/// Resolve the per-project transcript directory under the agent's data dir.
pub fn transcript_dir(project_root: &Path) -> Result<PathBuf> {
    Ok(default_log_root()?.join(encode_project_dir(project_root)))
}

/// Directory holding task-event logs and the benchmark state blob.
pub fn metrics_dir(project_root: &Path) -> PathBuf {
    project_root.join(".ham").join("metrics")
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Discover project root based on priority:
/// 1. explicit_project_root (--project-root flag)
/// 2. HAMSCOPE_PROJECT_ROOT environment variable
/// 3. Current working directory
pub fn discover_project_root(explicit_project_root: Option<&str>) -> Result<PathBuf> {
    if let Some(root) = explicit_project_root {
        return Ok(expand_tilde(root));
    }

    if let Ok(env_root) = std::env::var("HAMSCOPE_PROJECT_ROOT") {
        return Ok(PathBuf::from(env_root));
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd)
}
