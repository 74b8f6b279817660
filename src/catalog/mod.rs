//! Read-only model catalog.
//!
//! The catalog is built once, validated for `(provider, model_id)` uniqueness,
//! and kept sorted by provider then model id so every listing and every
//! stable sort downstream is deterministic.

mod builtin;
pub mod types;


pub use types::*;

use crate::error::{Result, RouterError};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Build a catalog from arbitrary entries, validating every descriptor.
    pub fn new(mut models: Vec<ModelDescriptor>) -> std::result::Result<Self, CatalogError> {
        if models.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for model in &models {
            Self::validate_entry(model)?;
            if !seen.insert((model.provider, model.model_id.as_str())) {
                return Err(CatalogError::DuplicateModel {
                    provider: model.provider,
                    model_id: model.model_id.clone(),
                });
            }
        }

        models.sort_by(|a, b| {
            a.provider
                .cmp(&b.provider)
                .then_with(|| a.model_id.cmp(&b.model_id))
        });

        Ok(Self { models })
    }

    /// The builtin 2025 model table.
    pub fn builtin() -> std::result::Result<Self, CatalogError> {
        Self::new(builtin::builtin_models())
    }

    fn validate_entry(model: &ModelDescriptor) -> std::result::Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidEntry {
            provider: model.provider,
            model_id: model.model_id.clone(),
            reason: reason.to_string(),
        };

        if model.model_id.trim().is_empty() {
            return Err(invalid("empty model id"));
        }
        for cost in [model.input_cost_per_million, model.output_cost_per_million] {
            if !cost.is_finite() || cost < 0.0 {
                return Err(invalid("costs must be finite and non-negative"));
            }
        }
        if model.max_output_tokens == 0 || model.context_window_tokens == 0 {
            return Err(invalid("token limits must be positive"));
        }
        Ok(())
    }

    /// All models, ordered by provider then model id.
    pub fn list_models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, provider: Provider, model_id: &str) -> Option<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.provider == provider && m.model_id == model_id)
    }

    /// Look up one model, failing with `NotFound` when absent.
    pub fn get_model(&self, provider: Provider, model_id: &str) -> Result<&ModelDescriptor> {
        self.get(provider, model_id)
            .ok_or_else(|| RouterError::NotFound {
                provider: Some(provider),
                model_id: model_id.to_string(),
            })
    }

    pub fn models_for(&self, provider: Provider) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(move |m| m.provider == provider)
    }

    /// First model with this id in catalog order, whatever its provider.
    pub fn find_by_id(&self, model_id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.model_id == model_id)
    }

    pub fn by_specialty<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ModelDescriptor> {
        self.models.iter().filter(move |m| m.has_specialty(tag))
    }

    /// Models at or under `max_cost` per million input tokens, cheapest first.
    pub fn by_max_cost(&self, max_cost: Option<f64>) -> Vec<&ModelDescriptor> {
        let mut models: Vec<_> = self
            .models
            .iter()
            .filter(|m| max_cost.is_none_or(|limit| m.input_cost_per_million <= limit))
            .collect();
        models.sort_by(|a, b| a.input_cost_per_million.total_cmp(&b.input_cost_per_million));
        models
    }
}
