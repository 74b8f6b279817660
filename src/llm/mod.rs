pub mod anthropic;
pub mod gemini;
pub(crate) mod http;
pub mod ollama;
pub mod openai_compat;
pub mod provider;
pub mod types;

pub use provider::{ClientFactory, GenerationClient, ProviderRegistry};
pub use types::*;
