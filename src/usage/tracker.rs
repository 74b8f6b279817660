use crate::catalog::ModelDescriptor;
use crate::usage::types::{
    PersistenceError, UsageCharge, UsageState, UsageSummary, UsageTrackingConfig,
};
use chrono::{Days, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs as async_fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Supplies "today" as a calendar date.
pub type DateSource = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// The caller's local calendar date.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Rough token estimate: words * 1.3, rounded.
pub fn estimate_tokens(text: &str) -> u64 {
    let words = text.split_whitespace().count();
    (words as f64 * 1.3).round() as u64
}

/// Tracks daily spend against paid models and persists it best-effort.
pub struct UsageTracker {
    config: UsageTrackingConfig,
    path: Option<PathBuf>,
    state: Arc<Mutex<UsageState>>,
    today: DateSource,
}

impl std::fmt::Debug for UsageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageTracker")
            .field("config", &self.config)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl UsageTracker {
    /// A tracker that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::with_state(None, UsageTrackingConfig::default(), UsageState::default())
    }

    fn with_state(path: Option<PathBuf>, config: UsageTrackingConfig, state: UsageState) -> Self {
        Self {
            config,
            path,
            state: Arc::new(Mutex::new(state)),
            today: Arc::new(local_today),
        }
    }

    /// Load persisted state from `path`. Missing or corrupt files start empty.
    pub async fn load(path: impl Into<PathBuf>, config: UsageTrackingConfig) -> Self {
        let path = path.into();
        let state = Self::read_state(&path).await;
        Self::with_state(Some(path), config, state)
    }

    pub fn with_date_source(mut self, today: DateSource) -> Self {
        self.today = today;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn today(&self) -> NaiveDate {
        (self.today)()
    }

    async fn read_state(path: &Path) -> UsageState {
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No usage state at {}, starting fresh", path.display());
                return UsageState::default();
            }
            Err(e) => {
                warn!("Failed to read usage state {}: {}", path.display(), e);
                return UsageState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    "Corrupt usage state {}, resetting: {}",
                    path.display(),
                    e
                );
                UsageState::default()
            }
        }
    }

    /// Estimated USD cost of one exchange on `model`.
    pub fn estimate_cost(model: &ModelDescriptor, prompt: &str, response: &str) -> UsageCharge {
        let input_tokens = estimate_tokens(prompt);
        let output_tokens = estimate_tokens(response);
        let cost = (input_tokens as f64 * model.input_cost_per_million
            + output_tokens as f64 * model.output_cost_per_million)
            / 1_000_000.0;

        UsageCharge {
            input_tokens,
            output_tokens,
            cost,
        }
    }

    /// Charge one completed exchange to today's bucket.
    ///
    /// Free models are not recorded. The state lock is held across the
    /// write so concurrent callers cannot lose updates.
    pub async fn record_usage(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
        response: &str,
    ) -> UsageCharge {
        if model.is_free() {
            return UsageCharge::FREE;
        }

        let charge = Self::estimate_cost(model, prompt, response);
        let today = self.today();

        let mut state = self.state.lock().await;
        *state.daily_spending.entry(today).or_insert(0.0) += charge.cost;
        state.total_requests += 1;
        self.prune_old_buckets(&mut state, today);

        debug!(
            "Recorded ${:.6} for {} ({} in / {} out tokens), today ${:.6}",
            charge.cost,
            model.qualified_name(),
            charge.input_tokens,
            charge.output_tokens,
            state.spend_on(today)
        );

        if let Err(e) = self.persist(&state).await {
            warn!("Usage state not persisted: {}", e);
        }

        charge
    }

    fn prune_old_buckets(&self, state: &mut UsageState, today: NaiveDate) {
        let Some(days) = self.config.retention_days else {
            return;
        };
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(days))) else {
            return;
        };
        let before = state.daily_spending.len();
        state
            .daily_spending
            .retain(|date, _| *date >= cutoff || *date == today);
        let pruned = before - state.daily_spending.len();
        if pruned > 0 {
            info!("Pruned {} usage buckets older than {}", pruned, cutoff);
        }
    }

    /// Today's accumulated spend in USD.
    pub async fn daily_spending(&self) -> f64 {
        let today = self.today();
        self.state.lock().await.spend_on(today)
    }

    /// `max(0, daily_budget - daily_spending())`.
    pub async fn remaining_budget(&self, daily_budget: f64) -> f64 {
        (daily_budget - self.daily_spending().await).max(0.0)
    }

    pub async fn total_requests(&self) -> u64 {
        self.state.lock().await.total_requests
    }

    pub async fn snapshot(&self) -> UsageState {
        self.state.lock().await.clone()
    }

    pub async fn summary(&self, daily_budget: f64) -> UsageSummary {
        let today = self.today();
        let state = self.state.lock().await;
        let daily_spending = state.spend_on(today);

        UsageSummary {
            daily_budget,
            daily_spending,
            remaining_budget: (daily_budget - daily_spending).max(0.0),
            total_requests: state.total_requests,
        }
    }

    /// Write the current state to disk.
    pub async fn save(&self) -> Result<(), PersistenceError> {
        let state = self.state.lock().await;
        self.persist(&state).await
    }

    /// Serialize to a sibling temp file, then rename over the target.
    async fn persist(&self, state: &UsageState) -> Result<(), PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| PersistenceError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(state)?;
        let temp_path = path.with_extension("json.tmp");
        async_fs::write(&temp_path, content).await.map_err(io_err)?;
        async_fs::rename(&temp_path, path).await.map_err(io_err)?;
        Ok(())
    }
}
