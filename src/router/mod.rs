//! The chat orchestrator.
//!
//! [`LlmRouter`] is the one manager instance an application builds at
//! startup. It owns the catalog, the cached availability snapshot, the usage
//! tracker and the client registry, and routes each chat through
//! select -> budget gate -> generate -> record.

pub mod types;


pub use types::*;

use crate::availability::{
    AvailabilityProber, CredentialSource, EnvCredentials, HttpReachability, ProviderAvailability,
    ReachabilityCheck,
};
use crate::catalog::{ModelCatalog, ModelDescriptor, Provider};
use crate::error::{Result, RouterError};
use crate::llm::{GenerationRequest, LLMError, ProviderRegistry};
use crate::selector::{ModelSelector, SelectionRequest};
use crate::usage::{UsageSummary, UsageTracker, estimate_tokens};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Collaborators a router is assembled from.
pub struct RouterParts {
    pub catalog: ModelCatalog,
    pub credentials: Arc<dyn CredentialSource>,
    pub reachability: Arc<dyn ReachabilityCheck>,
    pub usage: UsageTracker,
    pub registry: ProviderRegistry,
}

pub struct LlmRouter {
    config: RouterConfig,
    catalog: Arc<ModelCatalog>,
    selector: ModelSelector,
    prober: AvailabilityProber,
    availability: RwLock<ProviderAvailability>,
    usage: UsageTracker,
    registry: ProviderRegistry,
}

impl LlmRouter {
    /// Build a router over the builtin catalog, process environment
    /// credentials, the local Ollama daemon and the HTTP clients.
    pub async fn new(config: RouterConfig) -> Result<Self> {
        let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials);
        let reachability = Arc::new(HttpReachability::new(
            config.ollama_base_url.clone(),
            config.probe_timeout(),
        ));
        let usage = match config.resolved_usage_file() {
            Some(path) => UsageTracker::load(path, config.usage_tracking()).await,
            None => {
                warn!("No home directory found, usage will not be persisted");
                UsageTracker::in_memory()
            }
        };
        let registry =
            ProviderRegistry::with_defaults(credentials.as_ref(), &config.client_settings());

        let parts = RouterParts {
            catalog: ModelCatalog::builtin()?,
            credentials,
            reachability,
            usage,
            registry,
        };
        Ok(Self::from_parts(config, parts).await)
    }

    /// Assemble a router from explicit collaborators and probe once.
    pub async fn from_parts(config: RouterConfig, parts: RouterParts) -> Self {
        let catalog = Arc::new(parts.catalog);
        let default_models = Self::default_models(&config, parts.credentials.as_ref());
        let selector = ModelSelector::new(catalog.clone()).with_default_models(default_models);
        let prober = AvailabilityProber::new(parts.credentials, parts.reachability);
        let availability = prober.probe().await;

        info!(
            "Router ready: {} models, daily budget ${:.2}",
            catalog.len(),
            config.daily_budget
        );

        Self {
            config,
            catalog,
            selector,
            prober,
            availability: RwLock::new(availability),
            usage: parts.usage,
            registry: parts.registry,
        }
    }

    /// Config overrides, then `<PROVIDER>_DEFAULT_MODEL` from the credential
    /// source on top.
    fn default_models(
        config: &RouterConfig,
        credentials: &dyn CredentialSource,
    ) -> BTreeMap<Provider, String> {
        let mut defaults = config.default_models_by_provider();
        for provider in Provider::ALL {
            if let Some(model) = credentials
                .get(&provider.default_model_var())
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
            {
                debug!("Default model for {} from environment: {}", provider, model);
                defaults.insert(provider, model);
            }
        }
        defaults
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// The cached availability snapshot.
    pub async fn availability(&self) -> ProviderAvailability {
        self.availability.read().await.clone()
    }

    /// Probe providers again and replace the cached snapshot.
    pub async fn reprobe(&self) -> ProviderAvailability {
        let fresh = self.prober.probe().await;
        *self.availability.write().await = fresh.clone();
        fresh
    }

    /// Resolve the model a request would use, without calling it.
    pub async fn select(&self, request: &SelectionRequest) -> Result<ModelDescriptor> {
        let availability = self.availability.read().await;
        self.selector.select(&availability, request).cloned()
    }

    /// Send `request` and return the generated text verbatim.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        self.chat_detailed(request).await.map(|outcome| outcome.content)
    }

    pub async fn chat_detailed(&self, request: &ChatRequest) -> Result<ChatOutcome> {
        let (model, downgraded) = self.resolve_within_budget(request).await?;

        let client = self
            .registry
            .client(model.provider, &model.model_id)
            .map_err(|source| Self::generation_failed(&model, source))?;

        let generation = GenerationRequest::new(request.message.clone(), self.config.temperature)
            .with_max_tokens(model.max_output_tokens);
        let response = client
            .generate(generation)
            .await
            .map_err(|source| Self::generation_failed(&model, source))?;

        let charge = self
            .usage
            .record_usage(&model, &request.message, &response.content)
            .await;
        info!(
            "Chat served by {} in {:?} (${:.6})",
            model.qualified_name(),
            response.execution_time,
            charge.cost
        );

        Ok(ChatOutcome {
            content: response.content,
            model,
            charge,
            downgraded,
            execution_time: response.execution_time,
        })
    }

    /// Select a model, then swap in a free local one when the paid pick
    /// does not fit the remaining budget.
    async fn resolve_within_budget(&self, request: &ChatRequest) -> Result<(ModelDescriptor, bool)> {
        let availability = self.availability.read().await.clone();
        let model = self
            .selector
            .select(&availability, &request.selection())?
            .clone();

        if model.is_free() {
            return Ok((model, false));
        }

        let estimated = Self::estimate_request_cost(&model, &request.message);
        let remaining = self.usage.remaining_budget(self.config.daily_budget).await;
        debug!(
            "Budget gate for {}: estimated ${:.6}, remaining ${:.6}",
            model.qualified_name(),
            estimated,
            remaining
        );

        if estimated <= remaining && remaining > 0.0 {
            return Ok((model, false));
        }

        warn!(
            "Estimated ${:.6} for {} exceeds remaining budget ${:.6}, looking for a free local model",
            estimated,
            model.qualified_name(),
            remaining
        );
        let fallback = self
            .selector
            .select_free_fallback(&availability, request.task_type, request.priority)
            .cloned()
            .ok_or(RouterError::BudgetExceeded {
                estimated,
                remaining,
            })?;
        info!("Budget fallback to {}", fallback.qualified_name());
        Ok((fallback, true))
    }

    /// Conservative pre-call estimate: the response is assumed as long as
    /// the prompt and billed at the input rate.
    pub fn estimate_request_cost(model: &ModelDescriptor, message: &str) -> f64 {
        (estimate_tokens(message) * 2) as f64 * model.input_cost_per_million / 1_000_000.0
    }

    fn generation_failed(model: &ModelDescriptor, source: LLMError) -> RouterError {
        error!("Generation failed on {}: {}", model.qualified_name(), source);
        RouterError::Provider {
            provider: model.provider,
            model_id: model.model_id.clone(),
            source,
        }
    }

    /// Catalog lookup regardless of availability.
    pub fn get_model(&self, provider: Provider, model_id: &str) -> Result<ModelDescriptor> {
        self.catalog.get_model(provider, model_id).cloned()
    }

    /// Available models, optionally narrowed to one provider or specialty.
    pub async fn list_models(
        &self,
        provider: Option<Provider>,
        specialty: Option<&str>,
    ) -> Vec<ModelDescriptor> {
        let availability = self.availability.read().await;
        self.catalog
            .list_models()
            .iter()
            .filter(|m| availability.is_available(m.provider))
            .filter(|m| provider.is_none_or(|p| m.provider == p))
            .filter(|m| specialty.is_none_or(|tag| m.has_specialty(tag)))
            .cloned()
            .collect()
    }

    /// Available models under `max_cost` per million input tokens, cheapest first.
    pub async fn models_by_cost(&self, max_cost: Option<f64>) -> Vec<ModelDescriptor> {
        let availability = self.availability.read().await;
        self.catalog
            .by_max_cost(max_cost)
            .into_iter()
            .filter(|m| availability.is_available(m.provider))
            .cloned()
            .collect()
    }

    pub async fn models_by_specialty(&self, tag: &str) -> Vec<ModelDescriptor> {
        self.list_models(None, Some(tag)).await
    }

    /// One row per `(provider, model_id)`; unknown pairs carry an error.
    pub async fn compare_models(&self, models: &[(Provider, String)]) -> Vec<ModelComparison> {
        let availability = self.availability.read().await;
        models
            .iter()
            .map(|(provider, model_id)| {
                let (model, error) = match self.catalog.get_model(*provider, model_id) {
                    Ok(model) => (Some(model.clone()), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                ModelComparison {
                    provider: *provider,
                    model_id: model_id.clone(),
                    available: model.is_some() && availability.is_available(*provider),
                    model,
                    error,
                }
            })
            .collect()
    }

    pub async fn usage_summary(&self) -> UsageSummary {
        self.usage.summary(self.config.daily_budget).await
    }

    pub async fn status(&self) -> RouterStatus {
        RouterStatus {
            usage: self.usage_summary().await,
            availability: self.availability().await,
            catalog_size: self.catalog.len(),
            usage_file: self.usage.path().map(|p| p.to_path_buf()),
        }
    }
}
