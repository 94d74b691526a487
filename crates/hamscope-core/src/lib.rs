pub mod path;

pub use path::{
    Error, Result, default_log_root, discover_project_root, encode_project_dir, expand_tilde,
    metrics_dir, transcript_dir,
};
