//! Client for the Anthropic messages API.

use crate::catalog::Provider;
use crate::env::endpoints;
use crate::llm::http::{endpoint, send_json};
use crate::llm::provider::GenerationClient;
use crate::llm::types::{GenerationRequest, GenerationResponse, LLMError};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// The messages API requires an explicit output cap.
const DEFAULT_MAX_TOKENS: u64 = 4096;

pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u64,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
        }
    }

    fn extract_text(response: &MessagesResponse) -> Result<String, LLMError> {
        let text: Vec<&str> = response
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(LLMError::InvalidResponse(
                "response contained no text blocks".to_string(),
            ));
        }
        Ok(text.concat())
    }
}

impl GenerationClient for AnthropicClient {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>> {
        Box::pin(async move {
            let start = Instant::now();
            let body = MessagesRequest {
                model: &self.model_id,
                max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: request.temperature,
                messages: vec![Message {
                    role: "user",
                    content: &request.prompt,
                }],
            };

            let response: MessagesResponse = send_json(
                self.http
                    .post(endpoint(&self.base_url, "messages"))
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", endpoints::ANTHROPIC_VERSION)
                    .json(&body),
            )
            .await?;

            let content = Self::extract_text(&response)?;
            Ok(GenerationResponse {
                request_id: request.id,
                content,
                model_used: response.model.unwrap_or_else(|| self.model_id.clone()),
                execution_time: start.elapsed(),
            })
        })
    }

    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
