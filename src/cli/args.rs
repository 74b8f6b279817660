//! Command line argument parsing
//!
//! Subcommands:
//! - `chat`: Route one message and print the reply
//! - `select`: Show which model a request would use, without calling it
//! - `models`: List available models
//! - `compare`: Compare specific `provider:model` pairs
//! - `status`: Show budget, spend and provider availability
//! - `show-config`: Show configuration discovery information
//! - `init-config`: Write a default user configuration file

use crate::catalog::Provider;
use crate::selector::{Priority, TaskType};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "llm-router")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cost-aware routing across cloud and local LLM providers")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path (overrides discovery)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selection flags shared by `chat` and `select`.
#[derive(Debug, Clone, clap::Args)]
pub struct SelectionArgs {
    /// Task type used to filter candidates
    #[arg(short = 't', long = "task", value_enum)]
    pub task: Option<TaskType>,
    /// Ranking priority
    #[arg(short = 'p', long = "priority", value_enum)]
    pub priority: Option<Priority>,
    /// Restrict selection to one provider
    #[arg(long = "provider")]
    pub provider: Option<Provider>,
    /// Use this exact model id
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Route a message to the best model and print the reply
    Chat {
        /// Message to send
        message: String,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Override the daily budget in USD
        #[arg(short = 'b', long = "budget")]
        budget: Option<f64>,
    },
    /// Show which model would be selected, without calling it
    Select {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Maximum input cost per million tokens
        #[arg(long = "max-cost")]
        max_cost: Option<f64>,
    },
    /// List available models
    Models {
        /// Only this provider
        #[arg(long = "provider")]
        provider: Option<Provider>,
        /// Only models with this specialty tag
        #[arg(short = 's', long = "specialty")]
        specialty: Option<String>,
        /// Maximum input cost per million tokens, cheapest first
        #[arg(long = "max-cost")]
        max_cost: Option<f64>,
    },
    /// Compare models given as `provider:model`
    Compare {
        #[arg(required = true, value_parser = parse_model_ref)]
        models: Vec<(Provider, String)>,
    },
    /// Show budget, spend and provider availability
    Status,
    /// Show configuration discovery information
    ShowConfig,
    /// Write a default configuration file to ~/.llm-router/config.toml
    InitConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }
}

/// Parse `provider:model_id`. The model id may itself contain `:`.
pub fn parse_model_ref(value: &str) -> Result<(Provider, String), String> {
    let (provider, model_id) = value
        .split_once(':')
        .ok_or_else(|| format!("expected provider:model, got '{}'", value))?;
    let provider = provider.parse::<Provider>().map_err(|e| e.to_string())?;
    let model_id = model_id.trim();
    if model_id.is_empty() {
        return Err(format!("missing model id in '{}'", value));
    }
    Ok((provider, model_id.to_string()))
}
