use crate::availability::{CredentialSource, credential_is_usable};
use crate::catalog::Provider;
use crate::env::endpoints;
use crate::llm::anthropic::AnthropicClient;
use crate::llm::gemini::GeminiClient;
use crate::llm::ollama::OllamaClient;
use crate::llm::openai_compat::OpenAiCompatibleClient;
use crate::llm::types::{ClientSettings, GenerationRequest, GenerationResponse, LLMError};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A generation client bound to one provider model.
pub trait GenerationClient: Send + Sync {
    /// Send one prompt. Failures are returned as-is; retries are the client's business.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>>;

    fn provider(&self) -> Provider;

    fn model_id(&self) -> &str;
}

/// Builds a client for a model id.
pub type ClientFactory = Arc<dyn Fn(&str) -> Arc<dyn GenerationClient> + Send + Sync>;

/// `Provider -> factory(model_id) -> client`.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<Provider, ClientFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, provider: Provider, factory: F)
    where
        F: Fn(&str) -> Arc<dyn GenerationClient> + Send + Sync + 'static,
    {
        if self.factories.insert(provider, Arc::new(factory)).is_some() {
            debug!("Replaced client factory for {}", provider);
        }
    }

    pub fn with<F>(mut self, provider: Provider, factory: F) -> Self
    where
        F: Fn(&str) -> Arc<dyn GenerationClient> + Send + Sync + 'static,
    {
        self.register(provider, factory);
        self
    }

    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<_> = self.factories.keys().copied().collect();
        providers.sort();
        providers
    }

    pub fn client(
        &self,
        provider: Provider,
        model_id: &str,
    ) -> Result<Arc<dyn GenerationClient>, LLMError> {
        let factory = self.factories.get(&provider).ok_or_else(|| {
            LLMError::ProviderUnavailable(format!("no client registered for '{}'", provider))
        })?;
        Ok(factory(model_id))
    }

    /// Register the builtin HTTP clients for every provider with a usable
    /// credential, plus the local Ollama client.
    pub fn with_defaults(credentials: &dyn CredentialSource, settings: &ClientSettings) -> Self {
        let http = match reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            }
        };

        let mut registry = Self::new();

        for provider in Provider::ALL {
            if provider.is_local() {
                continue;
            }
            let Some(api_key) = provider
                .api_key_var()
                .and_then(|var| credentials.get(&var))
                .filter(|key| credential_is_usable(key))
                .map(|key| key.trim().to_string())
            else {
                continue;
            };

            let http = http.clone();
            match provider {
                Provider::Anthropic => registry.register(provider, move |model| {
                    Arc::new(AnthropicClient::new(
                        http.clone(),
                        endpoints::ANTHROPIC_BASE_URL,
                        api_key.clone(),
                        model,
                    ))
                }),
                Provider::Google => registry.register(provider, move |model| {
                    Arc::new(GeminiClient::new(
                        http.clone(),
                        endpoints::GEMINI_BASE_URL,
                        api_key.clone(),
                        model,
                    ))
                }),
                _ => {
                    let Some(base_url) = openai_compatible_base_url(provider) else {
                        continue;
                    };
                    registry.register(provider, move |model| {
                        Arc::new(OpenAiCompatibleClient::new(
                            http.clone(),
                            provider,
                            base_url,
                            api_key.clone(),
                            model,
                        ))
                    })
                }
            }
        }

        let ollama_url = settings.ollama_base_url.clone();
        registry.register(Provider::Ollama, move |model| {
            Arc::new(OllamaClient::new(http.clone(), ollama_url.clone(), model))
        });

        registry
    }
}

/// Base URL for providers that speak the OpenAI chat completions protocol.
pub fn openai_compatible_base_url(provider: Provider) -> Option<&'static str> {
    match provider {
        Provider::OpenAi => Some(endpoints::OPENAI_BASE_URL),
        Provider::DeepSeek => Some(endpoints::DEEPSEEK_BASE_URL),
        Provider::Groq => Some(endpoints::GROQ_BASE_URL),
        Provider::Xai => Some(endpoints::XAI_BASE_URL),
        Provider::Mistral => Some(endpoints::MISTRAL_BASE_URL),
        Provider::Anthropic | Provider::Google | Provider::Ollama => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::MapCredentials;

    struct Echo {
        model: String,
    }

    impl GenerationClient for Echo {
        fn generate(
            &self,
            request: GenerationRequest,
        ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>> {
            Box::pin(async move {
                Ok(GenerationResponse {
                    request_id: request.id,
                    content: request.prompt,
                    model_used: self.model.clone(),
                    execution_time: std::time::Duration::ZERO,
                })
            })
        }

        fn provider(&self) -> Provider {
            Provider::OpenAi
        }

        fn model_id(&self) -> &str {
            &self.model
        }
    }

    #[tokio::test]
    async fn test_registered_factory_builds_model_bound_client() {
        let registry = ProviderRegistry::new().with(Provider::OpenAi, |model| {
            Arc::new(Echo {
                model: model.to_string(),
            })
        });

        let client = registry.client(Provider::OpenAi, "gpt-4o-mini").unwrap();
        assert_eq!(client.model_id(), "gpt-4o-mini");

        let response = client
            .generate(GenerationRequest::new("ping", 0.1))
            .await
            .unwrap();
        assert_eq!(response.content, "ping");
    }

    #[test]
    fn test_missing_factory_is_provider_unavailable() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.client(Provider::Groq, "llama-3.1-8b-instant"),
            Err(LLMError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn test_defaults_register_only_credentialed_providers() {
        let credentials = MapCredentials::new()
            .with("OPENAI_API_KEY", "sk-test")
            .with("ANTHROPIC_API_KEY", "your_api_key_here")
            .with("GOOGLE_API_KEY", "g-key")
            .with("DEEPSEEK_API_KEY", "ds-key");
        let registry = ProviderRegistry::with_defaults(&credentials, &ClientSettings::default());

        assert_eq!(
            registry.providers(),
            vec![
                Provider::OpenAi,
                Provider::Google,
                Provider::DeepSeek,
                Provider::Ollama
            ]
        );

        let client = registry.client(Provider::DeepSeek, "deepseek-chat").unwrap();
        assert_eq!(client.provider(), Provider::DeepSeek);
        assert_eq!(client.model_id(), "deepseek-chat");
    }

    #[test]
    fn test_openai_compatible_providers() {
        assert!(openai_compatible_base_url(Provider::Xai).is_some());
        assert!(openai_compatible_base_url(Provider::Anthropic).is_none());
        assert!(openai_compatible_base_url(Provider::Ollama).is_none());
    }
}
