//! I/O boundary of hamscope: transcript parsing, task-event logs, routing
//! extraction, and the context-health directory scan.
//!
//! Everything here reads local files once and produces immutable value
//! objects; failures on one file never abort a batch.

pub mod health;
pub mod routing;
pub mod snapshot;
pub mod tasks;
pub mod transcript;

pub use health::scan_context_health;
pub use routing::{RoutingTable, classify_routing, extract_routing_table};
pub use snapshot::ProjectSnapshot;
pub use tasks::{BenchmarkState, TaskLogs, load_benchmark_state, load_task_logs};
pub use transcript::{ParseWarning, SessionBatch, parse_sessions, parse_sessions_at};
