mod args;
mod commands;
mod handlers;
mod output;

pub use args::{BenchmarkCommand, CarbonCommand, Cli, Commands};
pub use commands::run;
