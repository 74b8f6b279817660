//! Model selection.
//!
//! Candidates are the catalog entries whose provider is available. A forced
//! model is looked up directly; otherwise candidates are filtered by task fit
//! and price cap, then ranked by the strategy for the requested priority.
//! Selection is fully deterministic for a given catalog, availability and
//! request.

pub mod strategy;
pub mod types;


pub use strategy::{
    BalancedStrategy, CostStrategy, QualityStrategy, RankingStrategy, SpeedStrategy, rank,
};
pub use types::*;

use crate::availability::ProviderAvailability;
use crate::catalog::{ModelCatalog, ModelDescriptor, Provider};
use crate::error::{Result, RouterError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ModelSelector {
    catalog: Arc<ModelCatalog>,
    default_models: BTreeMap<Provider, String>,
}

impl ModelSelector {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self {
            catalog,
            default_models: BTreeMap::new(),
        }
    }

    /// Models used when a provider is forced without naming a model.
    pub fn with_default_models(mut self, default_models: BTreeMap<Provider, String>) -> Self {
        self.default_models = default_models;
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Pick the single best model for `request`.
    pub fn select(
        &self,
        availability: &ProviderAvailability,
        request: &SelectionRequest,
    ) -> Result<&ModelDescriptor> {
        let ranked = self.ranked_candidates(availability, request)?;
        let chosen = ranked[0];
        info!(
            "Selected {} for task={} priority={} ({} candidates)",
            chosen.qualified_name(),
            request.task_type,
            request.priority,
            ranked.len()
        );
        Ok(chosen)
    }

    /// All candidates for `request`, best first. Never empty on success.
    pub fn ranked_candidates(
        &self,
        availability: &ProviderAvailability,
        request: &SelectionRequest,
    ) -> Result<Vec<&ModelDescriptor>> {
        if let Some(model_id) = self.forced_model_id(request) {
            return self
                .resolve_forced(availability, request.force_provider, model_id)
                .map(|m| vec![m]);
        }

        let candidates: Vec<&ModelDescriptor> = self
            .catalog
            .list_models()
            .iter()
            .filter(|m| availability.is_available(m.provider))
            .filter(|m| request.force_provider.is_none_or(|p| m.provider == p))
            .filter(|m| request.task_type.matches(m))
            .filter(|m| {
                request
                    .max_cost_per_million
                    .is_none_or(|limit| m.input_cost_per_million <= limit)
            })
            .collect();

        debug!(
            "{} candidates after availability, task and cost filters",
            candidates.len()
        );

        if candidates.is_empty() {
            return Err(RouterError::NoCandidate(Self::describe(request)));
        }

        Ok(rank(candidates, request.priority.strategy()))
    }

    /// Best zero-cost model on an available local provider.
    ///
    /// Prefers models that fit `task_type`; falls back to any free local
    /// model when none does. `None` when no local provider is up.
    pub fn select_free_fallback(
        &self,
        availability: &ProviderAvailability,
        task_type: TaskType,
        priority: Priority,
    ) -> Option<&ModelDescriptor> {
        let free_local: Vec<&ModelDescriptor> = self
            .catalog
            .list_models()
            .iter()
            .filter(|m| m.provider.is_local() && m.is_free())
            .filter(|m| availability.is_available(m.provider))
            .collect();

        let fitting: Vec<&ModelDescriptor> = free_local
            .iter()
            .copied()
            .filter(|m| task_type.matches(m))
            .collect();

        let pool = if fitting.is_empty() { free_local } else { fitting };
        rank(pool, priority.strategy()).into_iter().next()
    }

    fn forced_model_id<'a>(&'a self, request: &'a SelectionRequest) -> Option<&'a str> {
        request.force_model.as_deref().or_else(|| {
            request
                .force_provider
                .and_then(|p| self.default_models.get(&p))
                .map(String::as_str)
        })
    }

    fn resolve_forced(
        &self,
        availability: &ProviderAvailability,
        provider: Option<Provider>,
        model_id: &str,
    ) -> Result<&ModelDescriptor> {
        let matches: Vec<&ModelDescriptor> = match provider {
            Some(p) => self.catalog.get(p, model_id).into_iter().collect(),
            None => self
                .catalog
                .list_models()
                .iter()
                .filter(|m| m.model_id == model_id)
                .collect(),
        };

        if matches.is_empty() {
            return Err(RouterError::NotFound {
                provider,
                model_id: model_id.to_string(),
            });
        }

        matches
            .into_iter()
            .find(|m| availability.is_available(m.provider))
            .inspect(|m| info!("Using forced model {}", m.qualified_name()))
            .ok_or_else(|| {
                RouterError::NoCandidate(format!(
                    "model '{}' exists but its provider is not available",
                    model_id
                ))
            })
    }

    fn describe(request: &SelectionRequest) -> String {
        let mut description = format!("task '{}'", request.task_type);
        if let Some(provider) = request.force_provider {
            description.push_str(&format!(" with provider '{}'", provider));
        }
        if let Some(limit) = request.max_cost_per_million {
            description.push_str(&format!(" under ${}/1M input tokens", limit));
        }
        description
    }
}
