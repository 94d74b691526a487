pub mod domain;
pub mod pricing;
mod util;

pub use domain::*;
pub use pricing::{ModelPricing, calculate_cost, pricing_for};
pub use util::*;
