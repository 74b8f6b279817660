use crate::availability::ProviderAvailability;
use crate::catalog::{ModelDescriptor, Provider};
use crate::env;
use crate::llm::ClientSettings;
use crate::selector::{Priority, SelectionRequest, TaskType};
use crate::usage::{UsageCharge, UsageSummary, UsageTrackingConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Router configuration, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Daily spending cap in USD
    pub daily_budget: f64,
    /// Usage state file; `~/.llm-router/usage.json` when unset
    pub usage_file: Option<PathBuf>,
    pub ollama_base_url: String,
    pub probe_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub temperature: f32,
    pub default_task_type: TaskType,
    pub default_priority: Priority,
    /// Days of daily buckets kept in the usage file; `0` keeps everything
    pub retention_days: u32,
    /// Provider name -> model id used when only the provider is forced
    pub default_models: BTreeMap<String, String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            daily_budget: 5.0,
            usage_file: None,
            ollama_base_url: env::local::OLLAMA_BASE_URL.to_string(),
            probe_timeout_secs: env::local::PROBE_TIMEOUT_SECS,
            request_timeout_secs: 120,
            temperature: 0.1,
            default_task_type: TaskType::General,
            default_priority: Priority::Cost,
            retention_days: UsageTrackingConfig::default()
                .retention_days
                .unwrap_or(0),
            default_models: BTreeMap::new(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Convert configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Where usage state lives. `None` keeps it in memory only.
    pub fn resolved_usage_file(&self) -> Option<PathBuf> {
        self.usage_file
            .clone()
            .or_else(|| env::home_dir().map(|home| env::usage_file_path(&home)))
    }

    pub fn usage_tracking(&self) -> UsageTrackingConfig {
        UsageTrackingConfig {
            retention_days: (self.retention_days > 0).then_some(self.retention_days),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            ollama_base_url: self.ollama_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// `default_models` keyed by provider. Unknown provider names are skipped.
    pub fn default_models_by_provider(&self) -> BTreeMap<Provider, String> {
        self.default_models
            .iter()
            .filter_map(|(name, model)| match name.parse::<Provider>() {
                Ok(provider) => Some((provider, model.clone())),
                Err(e) => {
                    warn!("Ignoring default model override: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// One chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub task_type: TaskType,
    pub priority: Priority,
    pub force_provider: Option<Provider>,
    pub force_model: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            task_type: TaskType::General,
            priority: Priority::Cost,
            force_provider: None,
            force_model: None,
        }
    }

    pub fn with_task(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.force_provider = Some(provider);
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.force_model = Some(model_id.into());
        self
    }

    pub fn selection(&self) -> SelectionRequest {
        SelectionRequest {
            task_type: self.task_type,
            priority: self.priority,
            force_provider: self.force_provider,
            force_model: self.force_model.clone(),
            max_cost_per_million: None,
        }
    }
}

/// Everything a successful chat produced.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Generated text, verbatim
    pub content: String,
    pub model: ModelDescriptor,
    pub charge: UsageCharge,
    /// Set when the budget gate swapped in a free local model
    pub downgraded: bool,
    pub execution_time: Duration,
}

/// One row of `compare_models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelComparison {
    pub provider: Provider,
    pub model_id: String,
    pub model: Option<ModelDescriptor>,
    pub available: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouterStatus {
    pub usage: UsageSummary,
    pub availability: ProviderAvailability,
    pub catalog_size: usize,
    pub usage_file: Option<PathBuf>,
}
