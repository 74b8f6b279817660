//! Spend tracking and the daily budget.
//!
//! Only paid models are charged. Each charge lands in the bucket for the
//! caller's local calendar date and is written back to disk best-effort.

pub mod tracker;
pub mod types;

pub use tracker::{DateSource, UsageTracker, estimate_tokens, local_today};
pub use types::*;
