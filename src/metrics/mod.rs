//! Event types and run statistics aggregation.
mod histogram;
mod report;
mod stats;
mod types;

#[cfg(test)]
mod tests;

pub use histogram::LatencyHistogram;
pub use report::{PayloadBounds, RunReport};
pub use stats::RunStats;
pub use types::{EmitterEvent, PayloadSizes};
