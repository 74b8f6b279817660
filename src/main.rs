use anyhow::{Context, Result};
use llm_router::catalog::ModelDescriptor;
use llm_router::cli::{Args, Commands, ConfigDiscovery, SelectionArgs};
use llm_router::env::vars::DEFAULT_LOG_FILTER;
use llm_router::router::{ChatRequest, LlmRouter, ModelComparison, RouterConfig};
use llm_router::selector::SelectionRequest;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Credentials may live in a local .env file
    let dotenv = dotenvy::dotenv();

    let default_filter = if args.verbose {
        "llm_router=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    match args.command {
        Commands::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            let config = ConfigDiscovery::load(args.config.as_deref())?;
            println!();
            println!("Effective configuration:");
            println!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::InitConfig => {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
        command => {
            let config = ConfigDiscovery::load(args.config.as_deref())?;
            run(command, config, args.verbose).await
        }
    }
}

async fn run(command: Commands, mut config: RouterConfig, verbose: bool) -> Result<()> {
    if let Commands::Chat {
        budget: Some(budget),
        ..
    } = &command
    {
        info!("Daily budget overridden to ${:.2}", budget);
        config.daily_budget = *budget;
    }

    let router = LlmRouter::new(config)
        .await
        .context("Failed to initialize router")?;

    match command {
        Commands::Chat {
            message, selection, ..
        } => {
            let request = chat_request(message, &selection, router.config());
            let outcome = router.chat_detailed(&request).await?;
            println!("{}", outcome.content);
            if verbose {
                eprintln!(
                    "[{}{} | ${:.6} | {:?}]",
                    outcome.model.qualified_name(),
                    if outcome.downgraded {
                        " (budget fallback)"
                    } else {
                        ""
                    },
                    outcome.charge.cost,
                    outcome.execution_time
                );
            }
        }
        Commands::Select {
            selection,
            max_cost,
        } => {
            let mut request = selection_request(&selection, router.config());
            request.max_cost_per_million = max_cost;
            let model = router.select(&request).await?;
            println!("Selected: {}", model.qualified_name());
            print_model(&model);
        }
        Commands::Models {
            provider,
            specialty,
            max_cost,
        } => {
            let models: Vec<ModelDescriptor> = match max_cost {
                Some(limit) => router
                    .models_by_cost(Some(limit))
                    .await
                    .into_iter()
                    .filter(|m| provider.is_none_or(|p| m.provider == p))
                    .filter(|m| specialty.as_deref().is_none_or(|tag| m.has_specialty(tag)))
                    .collect(),
                None => router.list_models(provider, specialty.as_deref()).await,
            };

            if models.is_empty() {
                println!("No available models match.");
            }
            for model in &models {
                print_model(model);
            }
        }
        Commands::Compare { models } => {
            for row in router.compare_models(&models).await {
                print_comparison(&row);
            }
        }
        Commands::Status => {
            let status = router.status().await;
            println!("Daily budget:    ${:.2}", status.usage.daily_budget);
            println!("Spent today:     ${:.6}", status.usage.daily_spending);
            println!("Remaining:       ${:.6}", status.usage.remaining_budget);
            println!("Paid requests:   {}", status.usage.total_requests);
            println!("Catalog models:  {}", status.catalog_size);
            match &status.usage_file {
                Some(path) => println!("Usage file:      {}", path.display()),
                None => println!("Usage file:      (in memory)"),
            }
            println!();
            println!("Providers:");
            for (provider, up) in status.availability.iter() {
                println!(
                    "  {:<10} {}",
                    provider.as_str(),
                    if up { "available" } else { "unavailable" }
                );
            }
        }
        Commands::ShowConfig | Commands::InitConfig => {}
    }

    Ok(())
}

fn selection_request(selection: &SelectionArgs, config: &RouterConfig) -> SelectionRequest {
    SelectionRequest {
        task_type: selection.task.unwrap_or(config.default_task_type),
        priority: selection.priority.unwrap_or(config.default_priority),
        force_provider: selection.provider,
        force_model: selection.model.clone(),
        max_cost_per_million: None,
    }
}

fn chat_request(message: String, selection: &SelectionArgs, config: &RouterConfig) -> ChatRequest {
    let request = selection_request(selection, config);
    ChatRequest {
        message,
        task_type: request.task_type,
        priority: request.priority,
        force_provider: request.force_provider,
        force_model: request.force_model,
    }
}

fn print_model(model: &ModelDescriptor) {
    let specialties: Vec<&str> = model.specialties.iter().map(String::as_str).collect();
    println!(
        "  {:<42} in ${:>6.3}/M  out ${:>6.3}/M  {:?}/{:?}  [{}]",
        model.qualified_name(),
        model.input_cost_per_million,
        model.output_cost_per_million,
        model.speed_tier,
        model.quality_tier,
        specialties.join(", ")
    );
}

fn print_comparison(row: &ModelComparison) {
    let name = format!("{}:{}", row.provider, row.model_id);
    match (&row.model, &row.error) {
        (Some(model), _) => {
            println!(
                "{} ({})",
                name,
                if row.available {
                    "available"
                } else {
                    "unavailable"
                }
            );
            println!("    name:     {}", model.display_name);
            println!(
                "    cost:     ${:.3} in / ${:.3} out per million tokens",
                model.input_cost_per_million, model.output_cost_per_million
            );
            println!(
                "    limits:   {} output / {} context tokens",
                model.max_output_tokens, model.context_window_tokens
            );
            println!(
                "    tiers:    speed {:?}, quality {:?}",
                model.speed_tier, model.quality_tier
            );
        }
        (None, error) => println!(
            "{}: {}",
            name,
            error.as_deref().unwrap_or("unknown model")
        ),
    }
}
