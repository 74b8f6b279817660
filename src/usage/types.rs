use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Persisted spend state.
///
/// Serialized as `{"daily_spending": {"YYYY-MM-DD": usd}, "total_requests": n}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    #[serde(default)]
    pub daily_spending: BTreeMap<NaiveDate, f64>,
    #[serde(default)]
    pub total_requests: u64,
}

impl UsageState {
    pub fn spend_on(&self, date: NaiveDate) -> f64 {
        self.daily_spending.get(&date).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageTrackingConfig {
    /// Drop daily buckets older than this many days; `None` keeps everything
    pub retention_days: Option<u32>,
}

impl Default for UsageTrackingConfig {
    fn default() -> Self {
        Self {
            retention_days: Some(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub daily_budget: f64,
    pub daily_spending: f64,
    pub remaining_budget: f64,
    pub total_requests: u64,
}

/// What one call to `record_usage` charged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageCharge {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
}

impl UsageCharge {
    pub const FREE: UsageCharge = UsageCharge {
        input_tokens: 0,
        output_tokens: 0,
        cost: 0.0,
    };
}

/// Failure writing usage state. Never fatal to a chat request.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize usage state: {0}")]
    Serialize(#[from] serde_json::Error),
}
