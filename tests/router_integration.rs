use futures::future::BoxFuture;
use llm_router::availability::{MapCredentials, ProbeError, ReachabilityCheck};
use llm_router::llm::{GenerationRequest, GenerationResponse};
use llm_router::usage::UsageTrackingConfig;
use llm_router::{
    ChatRequest, GenerationClient, LLMError, LlmRouter, ModelCatalog, Priority, Provider,
    ProviderRegistry, RouterConfig, RouterError, RouterParts, TaskType, UsageTracker,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Echoes the prompt back and counts calls per provider kind.
struct EchoClient {
    provider: Provider,
    model: String,
    paid_calls: Arc<AtomicUsize>,
}

impl GenerationClient for EchoClient {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse, LLMError>> {
        Box::pin(async move {
            if !self.provider.is_local() {
                self.paid_calls.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
            Ok(GenerationResponse {
                request_id: request.id,
                content: format!("[{}] {}", self.model, request.prompt),
                model_used: self.model.clone(),
                execution_time: Duration::from_millis(2),
            })
        })
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

struct LocalService {
    up: bool,
}

impl ReachabilityCheck for LocalService {
    fn check(&self, _provider: Provider) -> BoxFuture<'_, Result<(), ProbeError>> {
        Box::pin(async move {
            if self.up {
                Ok(())
            } else {
                Err(ProbeError::Status(503))
            }
        })
    }
}

fn echo_registry(paid_calls: &Arc<AtomicUsize>) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for provider in Provider::ALL {
        let paid_calls = paid_calls.clone();
        registry.register(provider, move |model| {
            Arc::new(EchoClient {
                provider,
                model: model.to_string(),
                paid_calls: paid_calls.clone(),
            })
        });
    }
    registry
}

async fn router_with(
    config: RouterConfig,
    credentials: MapCredentials,
    local_up: bool,
    usage: UsageTracker,
    paid_calls: &Arc<AtomicUsize>,
) -> LlmRouter {
    let parts = RouterParts {
        catalog: ModelCatalog::builtin().expect("builtin catalog is valid"),
        credentials: Arc::new(credentials),
        reachability: Arc::new(LocalService { up: local_up }),
        usage,
        registry: echo_registry(paid_calls),
    };
    LlmRouter::from_parts(config, parts).await
}

async fn persistent_tracker(path: &Path) -> UsageTracker {
    UsageTracker::load(path, UsageTrackingConfig::default()).await
}

#[tokio::test]
async fn test_spend_survives_router_restart() {
    let temp_dir = TempDir::new().unwrap();
    let usage_path = temp_dir.path().join("state").join("usage.json");
    let paid_calls = Arc::new(AtomicUsize::new(0));
    let credentials = MapCredentials::new().with("ANTHROPIC_API_KEY", "sk-ant-test");

    let first = router_with(
        RouterConfig::default(),
        credentials.clone(),
        false,
        persistent_tracker(&usage_path).await,
        &paid_calls,
    )
    .await;
    let reply = first
        .chat(&ChatRequest::new("Summarize the borrow checker").with_priority(Priority::Speed))
        .await
        .unwrap();
    assert_eq!(
        reply,
        "[claude-3-haiku-20240307] Summarize the borrow checker"
    );
    let spent = first.usage().daily_spending().await;
    assert!(spent > 0.0);
    assert!(usage_path.exists());
    drop(first);

    let second = router_with(
        RouterConfig::default(),
        credentials,
        false,
        persistent_tracker(&usage_path).await,
        &paid_calls,
    )
    .await;
    let summary = second.usage_summary().await;
    assert_eq!(summary.total_requests, 1);
    assert!((summary.daily_spending - spent).abs() < 1e-12);
    assert!((summary.remaining_budget - (5.0 - spent)).abs() < 1e-12);
}

#[tokio::test]
async fn test_corrupt_usage_file_does_not_block_chat() {
    let temp_dir = TempDir::new().unwrap();
    let usage_path = temp_dir.path().join("usage.json");
    std::fs::write(&usage_path, "{ not json").unwrap();
    let paid_calls = Arc::new(AtomicUsize::new(0));

    let router = router_with(
        RouterConfig::default(),
        MapCredentials::new().with("GROQ_API_KEY", "gsk-test"),
        false,
        persistent_tracker(&usage_path).await,
        &paid_calls,
    )
    .await;

    assert_eq!(router.usage().total_requests().await, 0);
    router.chat(&ChatRequest::new("ping")).await.unwrap();
    assert_eq!(router.usage().total_requests().await, 1);

    let persisted: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&usage_path).unwrap()).unwrap();
    assert_eq!(persisted["total_requests"], 1);
}

#[tokio::test]
async fn test_zero_budget_never_calls_paid_provider() {
    let paid_calls = Arc::new(AtomicUsize::new(0));
    let config = RouterConfig {
        daily_budget: 0.0,
        ..RouterConfig::default()
    };
    let credentials = MapCredentials::new()
        .with("OPENAI_API_KEY", "sk-test")
        .with("MISTRAL_API_KEY", "mk-test");

    for task in [
        TaskType::General,
        TaskType::Coding,
        TaskType::Reasoning,
        TaskType::Multimodal,
    ] {
        for priority in [
            Priority::Cost,
            Priority::Speed,
            Priority::Quality,
            Priority::Balanced,
        ] {
            // No local service: every outcome is BudgetExceeded or NoCandidate
            let router = router_with(
                config.clone(),
                credentials.clone(),
                false,
                UsageTracker::in_memory(),
                &paid_calls,
            )
            .await;
            let request = ChatRequest::new("Prove it")
                .with_task(task)
                .with_priority(priority);
            match router.chat(&request).await {
                Err(RouterError::BudgetExceeded { .. }) | Err(RouterError::NoCandidate(_)) => {}
                other => panic!("unexpected outcome for {task}/{priority}: {other:?}"),
            }

            // With a local service every request is served for free
            let router = router_with(
                config.clone(),
                credentials.clone(),
                true,
                UsageTracker::in_memory(),
                &paid_calls,
            )
            .await;
            let outcome = router.chat_detailed(&request).await.unwrap();
            assert_eq!(outcome.model.provider, Provider::Ollama);
            assert_eq!(outcome.charge.cost, 0.0);
        }
    }

    assert_eq!(paid_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_chats_do_not_lose_spend() {
    let temp_dir = TempDir::new().unwrap();
    let usage_path = temp_dir.path().join("usage.json");
    let paid_calls = Arc::new(AtomicUsize::new(0));

    let router = Arc::new(
        router_with(
            RouterConfig::default(),
            MapCredentials::new().with("DEEPSEEK_API_KEY", "ds-test"),
            false,
            persistent_tracker(&usage_path).await,
            &paid_calls,
        )
        .await,
    );

    let single = {
        let model = router.get_model(Provider::DeepSeek, "deepseek-chat").unwrap();
        UsageTracker::estimate_cost(&model, "hello there", "[deepseek-chat] hello there").cost
    };

    let mut handles = Vec::new();
    for _ in 0..16 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            router.chat(&ChatRequest::new("hello there")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(paid_calls.load(Ordering::SeqCst), 16);
    assert_eq!(router.usage().total_requests().await, 16);
    assert!((router.usage().daily_spending().await - 16.0 * single).abs() < 1e-12);

    let reloaded = persistent_tracker(&usage_path).await;
    assert_eq!(reloaded.total_requests().await, 16);
}
