//! # LLM Router
//!
//! A cost-aware routing layer over cloud and local large-language-model
//! providers. A caller sends a prompt; the router picks the backend model from
//! the task type, a ranking priority and the remaining daily budget.
//!
//! ## Architecture Overview
//!
//! - **[`catalog`]**: Typed, validated table of known models and their prices
//! - **[`availability`]**: Which providers are usable right now
//! - **[`usage`]**: Daily spend tracking with best-effort JSON persistence
//! - **[`selector`]**: Task filters and pluggable ranking strategies
//! - **[`llm`]**: Generation clients and the provider registry
//! - **[`router`]**: The manager instance that ties everything together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_router::{ChatRequest, LlmRouter, RouterConfig, TaskType};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let router = LlmRouter::new(RouterConfig::default()).await?;
//!
//!     let reply = router
//!         .chat(&ChatRequest::new("Write a binary search in Rust").with_task(TaskType::Coding))
//!         .await?;
//!
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

/// Model catalog.
///
/// Immutable reference data: one descriptor per `(provider, model_id)`,
/// validated and sorted at construction.
pub mod catalog;

/// Provider availability probing.
pub mod availability;

/// Spend tracking and the daily budget.
pub mod usage;

/// Model selection and ranking strategies.
pub mod selector;

/// Generation clients for every supported provider.
pub mod llm;

/// Chat orchestration and the router manager.
pub mod router;

/// Environment constants and path utilities.
///
/// Centralizes paths, file names and environment variable names used
/// throughout the application.
pub mod env;

pub mod error;

// CLI module for command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod test_support;

pub use availability::{AvailabilityProber, ProviderAvailability};
pub use catalog::{ModelCatalog, ModelDescriptor, Provider, QualityTier, SpeedTier};
pub use error::{Result, RouterError};
pub use llm::{GenerationClient, LLMError, ProviderRegistry};
pub use router::{ChatOutcome, ChatRequest, LlmRouter, RouterConfig, RouterParts};
pub use selector::{ModelSelector, Priority, SelectionRequest, TaskType};
pub use usage::{UsageSummary, UsageTracker};
