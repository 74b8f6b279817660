use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One prompt sent to a model-bound generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub id: Uuid,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u64>,
}

/// Text produced by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub request_id: Uuid,
    pub content: String,
    pub model_used: String,
    pub execution_time: Duration,
}

/// Shared HTTP client settings for the builtin providers.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub ollama_base_url: String,
    pub request_timeout: Duration,
}

/// Generic LLM errors, opaque to the router.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LLMError {
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        reset_time: Option<DateTime<Utc>>,
    },
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Model not available: {0}")]
    ModelUnavailable(String),
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Provider-specific error: {0}")]
    ProviderSpecific(String),
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            ollama_base_url: crate::env::local::OLLAMA_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}
