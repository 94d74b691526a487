mod health;
mod session;
mod task;

pub use health::{HealthEntry, HealthStatus};
pub use session::{RoutingStatus, Session};
pub use task::{BenchmarkMode, Task};
