use super::*;
use crate::test_support::{closed_port_url, spawn_http_server};
use serial_test::serial;

const TAGS_BODY: &str = r#"{"models":[{"name":"llama3.2:latest","size":2019393189}]}"#;
const EMPTY_TAGS_BODY: &str = r#"{"models":[]}"#;

struct Unreachable;

impl ReachabilityCheck for Unreachable {
    fn check(&self, _provider: Provider) -> BoxFuture<'_, Result<(), ProbeError>> {
        Box::pin(async { Err(ProbeError::Request("connection refused".to_string())) })
    }
}

#[test]
fn test_credential_usability() {
    assert!(credential_is_usable("sk-live-123"));
    assert!(credential_is_usable("  sk-live-123\n"));
    assert!(!credential_is_usable(""));
    assert!(!credential_is_usable("   "));
    assert!(!credential_is_usable("your_api_key_here"));
    assert!(!credential_is_usable(" your_api_key_here "));
    assert!(!credential_is_usable("your_openai_key"));
}

#[tokio::test]
async fn test_probe_cloud_providers_from_credentials() {
    let credentials = MapCredentials::new()
        .with("OPENAI_API_KEY", "sk-test")
        .with("GROQ_API_KEY", "your_api_key_here")
        .with("MISTRAL_API_KEY", "   ");
    let prober = AvailabilityProber::new(Arc::new(credentials), Arc::new(Unreachable));

    let availability = prober.probe().await;

    assert!(availability.is_available(Provider::OpenAi));
    assert!(!availability.is_available(Provider::Groq));
    assert!(!availability.is_available(Provider::Mistral));
    assert!(!availability.is_available(Provider::Anthropic));
    assert!(!availability.is_available(Provider::Ollama));
    assert_eq!(availability.available_providers(), vec![Provider::OpenAi]);
}

#[tokio::test]
async fn test_probe_covers_every_provider() {
    let prober = AvailabilityProber::new(Arc::new(MapCredentials::new()), Arc::new(Unreachable));
    let availability = prober.probe().await;

    assert_eq!(availability.iter().count(), Provider::ALL.len());
    assert!(availability.available_providers().is_empty());
    assert!(!availability.has_local());
}

#[tokio::test]
async fn test_http_reachability_success() {
    let base_url = spawn_http_server("200 OK", TAGS_BODY).await;
    let check = HttpReachability::new(base_url, Duration::from_secs(2));

    assert!(check.check(Provider::Ollama).await.is_ok());
}

#[tokio::test]
async fn test_http_reachability_non_success_status() {
    let base_url = spawn_http_server("503 Service Unavailable", TAGS_BODY).await;
    let check = HttpReachability::new(base_url, Duration::from_secs(2));

    assert!(matches!(
        check.check(Provider::Ollama).await,
        Err(ProbeError::Status(503))
    ));
}

#[tokio::test]
async fn test_http_reachability_connection_refused() {
    let check = HttpReachability::new(closed_port_url().await, Duration::from_secs(2));

    assert!(matches!(
        check.check(Provider::Ollama).await,
        Err(ProbeError::Request(_))
    ));
}

#[tokio::test]
async fn test_http_reachability_invalid_url() {
    let check = HttpReachability::new("not a url", Duration::from_secs(2));

    assert!(matches!(
        check.check(Provider::Ollama).await,
        Err(ProbeError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_probe_marks_reachable_local_service() {
    let base_url = spawn_http_server("200 OK", TAGS_BODY).await;
    let prober = AvailabilityProber::new(
        Arc::new(MapCredentials::new()),
        Arc::new(HttpReachability::new(base_url, Duration::from_secs(2))),
    );

    let availability = prober.probe().await;
    assert!(availability.is_available(Provider::Ollama));
    assert!(availability.has_local());
}

#[tokio::test]
async fn test_http_reachability_requires_pulled_models() {
    let base_url = spawn_http_server("200 OK", EMPTY_TAGS_BODY).await;
    let check = HttpReachability::new(base_url, Duration::from_secs(2));

    assert!(matches!(
        check.check(Provider::Ollama).await,
        Err(ProbeError::NoModels)
    ));
}

#[tokio::test]
async fn test_http_reachability_malformed_body() {
    let base_url = spawn_http_server("200 OK", "<html>ok</html>").await;
    let check = HttpReachability::new(base_url, Duration::from_secs(2));

    assert!(matches!(
        check.check(Provider::Ollama).await,
        Err(ProbeError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_probe_skips_local_service_without_models() {
    let base_url = spawn_http_server("200 OK", EMPTY_TAGS_BODY).await;
    let prober = AvailabilityProber::new(
        Arc::new(MapCredentials::new()),
        Arc::new(HttpReachability::new(base_url, Duration::from_secs(2))),
    );

    let availability = prober.probe().await;
    assert!(!availability.is_available(Provider::Ollama));
    assert!(!availability.has_local());
}

#[test]
fn test_only_constructor() {
    let availability = ProviderAvailability::only(&[Provider::DeepSeek, Provider::Ollama]);

    assert!(availability.is_available(Provider::DeepSeek));
    assert!(availability.is_available(Provider::Ollama));
    assert!(!availability.is_available(Provider::OpenAi));
    assert_eq!(availability.iter().count(), Provider::ALL.len());
}

#[test]
#[serial]
fn test_env_credentials_reads_process_environment() {
    // SAFETY: serialized with other environment-mutating tests
    unsafe {
        std::env::set_var("LLM_ROUTER_TEST_CREDENTIAL", "sk-env");
    }
    assert_eq!(
        EnvCredentials.get("LLM_ROUTER_TEST_CREDENTIAL").as_deref(),
        Some("sk-env")
    );

    unsafe {
        std::env::remove_var("LLM_ROUTER_TEST_CREDENTIAL");
    }
    assert_eq!(EnvCredentials.get("LLM_ROUTER_TEST_CREDENTIAL"), None);
}
