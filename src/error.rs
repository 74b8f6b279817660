use crate::catalog::{CatalogError, Provider};
use crate::llm::LLMError;

/// Errors surfaced to callers of the router.
///
/// Persistence and availability failures never appear here; they are
/// recovered where they happen and logged.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Model '{model_id}' not found{}", provider.map(|p| format!(" for provider '{p}'")).unwrap_or_default())]
    NotFound {
        provider: Option<Provider>,
        model_id: String,
    },
    #[error("No suitable models found: {0}")]
    NoCandidate(String),
    #[error(
        "Estimated cost ${estimated:.6} exceeds remaining budget ${remaining:.6} and no free local model is available"
    )]
    BudgetExceeded { estimated: f64, remaining: f64 },
    #[error("Generation failed on {provider}:{model_id}: {source}")]
    Provider {
        provider: Provider,
        model_id: String,
        #[source]
        source: LLMError,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, RouterError>;
