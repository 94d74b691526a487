//! Test fixtures for the hamscope workspace.
//!
//! Provides builders for in-memory sessions and on-disk fixtures
//! (transcript logs in encoded project directories, task-event logs,
//! project source trees with context files).

pub mod fixtures;
pub mod sessions;

pub use fixtures::{
    ProjectTree, assistant_line, task_end_line, task_start_line, user_line, write_task_log,
    write_transcript,
};
pub use sessions::SessionBuilder;
