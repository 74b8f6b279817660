//! Client for the OpenAI chat completions protocol.
//!
//! OpenAI, DeepSeek, Groq, xAI and Mistral all accept this request shape.

use crate::catalog::Provider;
use crate::llm::http::{endpoint, send_json};
use crate::llm::provider::GenerationClient;
use crate::llm::types::{GenerationRequest, GenerationResponse, LLMError};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    provider: Provider,
    base_url: String,
    api_key: String,
    model_id: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        http: reqwest::Client,
        provider: Provider,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            provider,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
        }
    }

    fn extract_content(response: ChatCompletionResponse) -> Result<String, LLMError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LLMError::InvalidResponse("response contained no choices".to_string()))
    }
}

impl GenerationClient for OpenAiCompatibleClient {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>> {
        Box::pin(async move {
            let start = Instant::now();
            let body = ChatCompletionRequest {
                model: &self.model_id,
                messages: vec![ChatMessage {
                    role: "user",
                    content: &request.prompt,
                }],
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            };

            let response: ChatCompletionResponse = send_json(
                self.http
                    .post(endpoint(&self.base_url, "chat/completions"))
                    .bearer_auth(&self.api_key)
                    .json(&body),
            )
            .await?;

            let model_used = response
                .model
                .clone()
                .unwrap_or_else(|| self.model_id.clone());
            let content = Self::extract_content(response)?;

            Ok(GenerationResponse {
                request_id: request.id,
                content,
                model_used,
                execution_time: start.elapsed(),
            })
        })
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
