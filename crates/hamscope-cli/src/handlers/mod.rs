pub mod benchmark;
pub mod carbon;
pub mod daily;
pub mod directories;
pub mod health;
pub mod insights;
pub mod sessions;
pub mod stats;
