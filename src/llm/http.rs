//! JSON-over-HTTP plumbing shared by the builtin clients.

use crate::llm::types::LLMError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Send `request` and decode a JSON body, mapping failures onto [`LLMError`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, LLMError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            LLMError::Network(format!("request timed out: {}", e))
        } else {
            LLMError::Network(e.to_string())
        }
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LLMError::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(map_status(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| LLMError::InvalidResponse(e.to_string()))
}

pub(crate) fn map_status(status: StatusCode, body: &str) -> LLMError {
    let detail: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    let message = format!("HTTP {}: {}", status.as_u16(), detail);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimit {
            message,
            reset_time: None,
        },
        StatusCode::NOT_FOUND => LLMError::ModelUnavailable(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            LLMError::InvalidRequest(message)
        }
        s if s.is_server_error() => LLMError::ProviderUnavailable(message),
        _ => LLMError::ProviderSpecific(message),
    }
}

/// Join `path` onto `base`, tolerating a trailing slash on either side.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "bad key"),
            LLMError::Authentication(_)
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, ""),
            LLMError::RateLimit { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, ""),
            LLMError::ModelUnavailable(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, ""),
            LLMError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            map_status(StatusCode::IM_A_TEAPOT, ""),
            LLMError::ProviderSpecific(_)
        ));
    }

    #[test]
    fn test_error_body_is_truncated() {
        let body = "x".repeat(10_000);
        let LLMError::ProviderSpecific(message) = map_status(StatusCode::CONFLICT, &body) else {
            panic!("unexpected variant");
        };
        assert!(message.len() < 400);
    }

    #[test]
    fn test_endpoint_join() {
        assert_eq!(
            endpoint("http://localhost:11434/", "/api/chat"),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            endpoint("https://api.deepseek.com", "chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }
}
