//! Builtin model table.
//!
//! Prices are USD per million tokens as published by each vendor in 2025.

use super::types::{ModelDescriptor, Provider, QualityTier, SpeedTier};
use QualityTier::{Excellent, Good, High};
use SpeedTier::{Fast, Medium, Slow, UltraFast};

#[allow(clippy::too_many_arguments)]
fn entry(
    provider: Provider,
    model_id: &str,
    display_name: &str,
    costs: (f64, f64),
    max_output_tokens: u64,
    context_window_tokens: u64,
    tiers: (SpeedTier, QualityTier),
    specialties: &[&str],
) -> ModelDescriptor {
    ModelDescriptor::new(provider, model_id)
        .with_display_name(display_name)
        .with_costs(costs.0, costs.1)
        .with_limits(max_output_tokens, context_window_tokens)
        .with_tiers(tiers.0, tiers.1)
        .with_specialties(specialties.iter().copied())
}

#[rustfmt::skip]
pub(crate) fn builtin_models() -> Vec<ModelDescriptor> {
    use Provider::*;

    vec![
        // OpenAI
        entry(OpenAi, "gpt-4o", "GPT-4o", (2.50, 10.00), 4096, 128_000,
            (Medium, Excellent), &["reasoning", "multimodal", "general"]),
        entry(OpenAi, "gpt-4o-mini", "GPT-4o Mini", (0.15, 0.60), 16_384, 128_000,
            (Fast, High), &["general", "cost-effective"]),
        entry(OpenAi, "gpt-3.5-turbo", "GPT-3.5 Turbo", (0.50, 1.50), 4096, 16_385,
            (Fast, Good), &["general", "legacy"]),
        entry(OpenAi, "o1-mini", "OpenAI o1 Mini", (3.00, 12.00), 65_536, 128_000,
            (Slow, Excellent), &["reasoning", "math", "complex"]),
        // Anthropic
        entry(Anthropic, "claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet", (3.00, 15.00), 8192, 200_000,
            (Fast, Excellent), &["reasoning", "coding", "analysis"]),
        entry(Anthropic, "claude-3-haiku-20240307", "Claude 3 Haiku", (0.25, 1.25), 4096, 200_000,
            (UltraFast, High), &["speed", "cost-effective"]),
        entry(Anthropic, "claude-3-opus-20240229", "Claude 3 Opus", (15.00, 75.00), 4096, 200_000,
            (Medium, Excellent), &["complex-reasoning", "premium"]),
        // Google
        entry(Google, "gemini-1.5-pro", "Gemini 1.5 Pro", (1.25, 5.00), 8192, 2_000_000,
            (Medium, Excellent), &["multimodal", "long-context"]),
        entry(Google, "gemini-1.5-flash", "Gemini 1.5 Flash", (0.075, 0.30), 8192, 1_000_000,
            (UltraFast, High), &["speed", "cost-effective", "multimodal"]),
        entry(Google, "gemini-pro", "Gemini Pro", (0.50, 1.50), 32_768, 32_768,
            (Fast, High), &["general", "multimodal"]),
        // DeepSeek
        entry(DeepSeek, "deepseek-chat", "DeepSeek Chat", (0.14, 0.28), 4096, 32_768,
            (Fast, High), &["cost-effective", "general"]),
        entry(DeepSeek, "deepseek-coder", "DeepSeek Coder", (0.14, 0.28), 4096, 16_384,
            (Fast, Excellent), &["coding", "programming", "cost-effective"]),
        entry(DeepSeek, "deepseek-r1", "DeepSeek R1", (0.55, 2.19), 65_536, 65_536,
            (Medium, Excellent), &["reasoning", "math", "complex"]),
        // Groq
        entry(Groq, "llama-3.3-70b-versatile", "Llama 3.3 70B", (0.59, 0.79), 32_768, 131_072,
            (UltraFast, High), &["speed", "versatile"]),
        entry(Groq, "llama-3.1-8b-instant", "Llama 3.1 8B", (0.05, 0.08), 8192, 131_072,
            (UltraFast, Good), &["speed", "cost-effective"]),
        entry(Groq, "mixtral-8x7b-32768", "Mixtral 8x7B", (0.24, 0.24), 32_768, 32_768,
            (UltraFast, Good), &["speed", "multilingual"]),
        // xAI
        entry(Xai, "grok-2-1212", "Grok 2", (2.00, 10.00), 131_072, 131_072,
            (Medium, Excellent), &["reasoning", "real-time"]),
        entry(Xai, "grok-beta", "Grok Beta", (5.00, 15.00), 131_072, 131_072,
            (Medium, Excellent), &["latest", "experimental"]),
        // Mistral
        entry(Mistral, "mistral-large-latest", "Mistral Large", (2.00, 6.00), 128_000, 128_000,
            (Medium, Excellent), &["reasoning", "multilingual"]),
        entry(Mistral, "codestral-latest", "Codestral", (0.20, 0.60), 32_768, 32_768,
            (Fast, Excellent), &["coding", "programming"]),
        entry(Mistral, "mistral-small-latest", "Mistral Small", (0.04, 0.04), 128_000, 128_000,
            (Fast, Good), &["cost-effective", "small"]),
        // Ollama (local, free)
        entry(Ollama, "llama3.2", "Llama 3.2 (Local)", (0.0, 0.0), 128_000, 128_000,
            (Slow, Good), &["local", "free", "privacy", "general"]),
        entry(Ollama, "mistral", "Mistral (Local)", (0.0, 0.0), 32_768, 32_768,
            (Slow, QualityTier::Medium), &["local", "free"]),
        entry(Ollama, "qwen2.5", "Qwen 2.5 (Local)", (0.0, 0.0), 32_768, 32_768,
            (Slow, Good), &["local", "free", "multilingual"]),
        entry(Ollama, "codellama", "Code Llama (Local)", (0.0, 0.0), 16_384, 16_384,
            (Slow, Good), &["local", "free", "coding"]),
        entry(Ollama, "deepseek-coder", "DeepSeek Coder (Local)", (0.0, 0.0), 16_384, 16_384,
            (Slow, Excellent), &["local", "free", "coding"]),
        entry(Ollama, "deepseek-r1:latest", "DeepSeek R1 (Local)", (0.0, 0.0), 65_536, 65_536,
            (Slow, Excellent), &["local", "free", "reasoning", "math"]),
    ]
}
