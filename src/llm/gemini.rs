//! Client for the Google Gemini `generateContent` API.

use crate::catalog::Provider;
use crate::llm::http::{endpoint, send_json};
use crate::llm::provider::GenerationClient;
use crate::llm::types::{GenerationRequest, GenerationResponse, LLMError};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u64>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
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

    fn extract_text(response: GenerateContentResponse) -> Result<String, LLMError> {
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            return Err(LLMError::InvalidResponse(
                "response contained no candidate text".to_string(),
            ));
        }
        Ok(text)
    }
}

impl GenerationClient for GeminiClient {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>> {
        Box::pin(async move {
            let start = Instant::now();
            let body = GenerateContentRequest {
                contents: vec![Content {
                    role: "user",
                    parts: vec![Part {
                        text: &request.prompt,
                    }],
                }],
                generation_config: GenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_tokens,
                },
            };

            let path = format!("models/{}:generateContent", self.model_id);
            let response: GenerateContentResponse = send_json(
                self.http
                    .post(endpoint(&self.base_url, &path))
                    .query(&[("key", self.api_key.as_str())])
                    .json(&body),
            )
            .await?;

            Ok(GenerationResponse {
                request_id: request.id,
                content: Self::extract_text(response)?,
                model_used: self.model_id.clone(),
                execution_time: start.elapsed(),
            })
        })
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
