use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::env;

/// Supported LLM providers.
///
/// Declaration order is the catalog's provider ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    DeepSeek,
    Groq,
    Xai,
    Mistral,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 8] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::DeepSeek,
        Provider::Groq,
        Provider::Xai,
        Provider::Mistral,
        Provider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::DeepSeek => "deepseek",
            Provider::Groq => "groq",
            Provider::Xai => "xai",
            Provider::Mistral => "mistral",
            Provider::Ollama => "ollama",
        }
    }

    /// Local providers are reached over a local service rather than a credential.
    pub fn is_local(&self) -> bool {
        matches!(self, Provider::Ollama)
    }

    /// Credential variable for cloud providers (`OPENAI_API_KEY`, ...).
    pub fn api_key_var(&self) -> Option<String> {
        if self.is_local() {
            return None;
        }
        Some(format!(
            "{}{}",
            self.as_str().to_ascii_uppercase(),
            env::vars::API_KEY_SUFFIX
        ))
    }

    /// Optional per-provider default model variable (`OLLAMA_DEFAULT_MODEL`, ...).
    pub fn default_model_var(&self) -> String {
        format!(
            "{}{}",
            self.as_str().to_ascii_uppercase(),
            env::vars::DEFAULT_MODEL_SUFFIX
        )
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or(ParseProviderError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}'")]
pub struct ParseProviderError(pub String);

/// Response latency class of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    UltraFast,
    Fast,
    Medium,
    Slow,
}

impl SpeedTier {
    pub fn rank(&self) -> u8 {
        match self {
            SpeedTier::UltraFast => 0,
            SpeedTier::Fast => 1,
            SpeedTier::Medium => 2,
            SpeedTier::Slow => 3,
        }
    }

    /// Penalty in `[0, 1]` used by the balanced ranking.
    pub fn penalty(&self) -> f64 {
        match self {
            SpeedTier::UltraFast => 0.0,
            SpeedTier::Fast => 0.25,
            SpeedTier::Medium => 0.5,
            SpeedTier::Slow => 1.0,
        }
    }
}

/// Output quality class of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    High,
    Good,
    Medium,
}

impl QualityTier {
    pub fn rank(&self) -> u8 {
        match self {
            QualityTier::Excellent => 0,
            QualityTier::High => 1,
            QualityTier::Good => 2,
            QualityTier::Medium => 3,
        }
    }

    /// Penalty in `[0, 1]` used by the balanced ranking.
    pub fn penalty(&self) -> f64 {
        match self {
            QualityTier::Excellent => 0.0,
            QualityTier::High => 0.25,
            QualityTier::Good => 0.5,
            QualityTier::Medium => 1.0,
        }
    }
}

/// Static metadata about one callable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub provider: Provider,
    pub model_id: String,
    pub display_name: String,
    /// USD per million input tokens; `0.0` means free/local
    pub input_cost_per_million: f64,
    /// USD per million output tokens
    pub output_cost_per_million: f64,
    pub max_output_tokens: u64,
    pub context_window_tokens: u64,
    pub speed_tier: SpeedTier,
    pub quality_tier: QualityTier,
    pub specialties: BTreeSet<String>,
}

impl ModelDescriptor {
    pub fn new(provider: Provider, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        Self {
            provider,
            display_name: model_id.clone(),
            model_id,
            input_cost_per_million: 0.0,
            output_cost_per_million: 0.0,
            max_output_tokens: 4096,
            context_window_tokens: 8192,
            speed_tier: SpeedTier::Medium,
            quality_tier: QualityTier::Good,
            specialties: BTreeSet::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_costs(mut self, input: f64, output: f64) -> Self {
        self.input_cost_per_million = input;
        self.output_cost_per_million = output;
        self
    }

    pub fn with_limits(mut self, max_output_tokens: u64, context_window_tokens: u64) -> Self {
        self.max_output_tokens = max_output_tokens;
        self.context_window_tokens = context_window_tokens;
        self
    }

    pub fn with_tiers(mut self, speed: SpeedTier, quality: QualityTier) -> Self {
        self.speed_tier = speed;
        self.quality_tier = quality;
        self
    }

    pub fn with_specialties<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specialties.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Zero input cost marks a free (typically local) model.
    pub fn is_free(&self) -> bool {
        self.input_cost_per_million == 0.0
    }

    pub fn has_specialty(&self, tag: &str) -> bool {
        self.specialties.contains(tag)
    }

    /// `provider:model_id`, the form used on the command line and in logs.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.provider, self.model_id)
    }
}

/// Catalog validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog contains no models")]
    Empty,
    #[error("Duplicate catalog entry: {provider}:{model_id}")]
    DuplicateModel { provider: Provider, model_id: String },
    #[error("Invalid catalog entry {provider}:{model_id}: {reason}")]
    InvalidEntry {
        provider: Provider,
        model_id: String,
        reason: String,
    },
}
