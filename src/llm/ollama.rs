//! Client for a local Ollama daemon.

use crate::catalog::Provider;
use crate::env::local;
use crate::llm::http::{endpoint, send_json};
use crate::llm::provider::GenerationClient;
use crate::llm::types::{GenerationRequest, GenerationResponse, LLMError};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model_id: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u64>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model_id: model_id.into(),
        }
    }
}

impl GenerationClient for OllamaClient {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>> {
        Box::pin(async move {
            let start = Instant::now();
            let body = ChatRequest {
                model: &self.model_id,
                messages: vec![ChatMessage {
                    role: "user",
                    content: &request.prompt,
                }],
                stream: false,
                options: ChatOptions {
                    temperature: request.temperature,
                    num_predict: request.max_tokens,
                },
            };

            let response: ChatResponse = send_json(
                self.http
                    .post(endpoint(&self.base_url, local::OLLAMA_CHAT_PATH))
                    .json(&body),
            )
            .await?;

            Ok(GenerationResponse {
                request_id: request.id,
                content: response.message.content,
                model_used: response.model.unwrap_or_else(|| self.model_id.clone()),
                execution_time: start.elapsed(),
            })
        })
    }

    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
