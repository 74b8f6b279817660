//! Environment constants and path utilities for the router.
//!
//! This module centralizes hardcoded paths, file names and environment variable
//! names, making them easier to maintain and modify.

use std::path::{Path, PathBuf};

/// Main application directory name (hidden directory like .git, .vscode)
pub const ROUTER_DIR_NAME: &str = ".llm-router";

/// Configuration file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up directly in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "llm-router.toml";

/// Persisted usage state file name
pub const USAGE_FILE_NAME: &str = "usage.json";

/// Environment variable names and well-known sentinel values
pub mod vars {
    /// Suffix appended to the provider name to form its credential variable
    pub const API_KEY_SUFFIX: &str = "_API_KEY";

    /// Suffix of the optional per-provider default model override
    pub const DEFAULT_MODEL_SUFFIX: &str = "_DEFAULT_MODEL";

    /// Placeholder value shipped in example `.env` files
    pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

    /// Log filter used when `RUST_LOG` is not set
    pub const DEFAULT_LOG_FILTER: &str = "llm_router=info";
}

/// Local inference service defaults
pub mod local {
    /// Base URL of the local Ollama daemon
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

    /// Lightweight endpoint used for reachability checks
    pub const OLLAMA_TAGS_PATH: &str = "api/tags";

    /// Chat endpoint of the local daemon
    pub const OLLAMA_CHAT_PATH: &str = "api/chat";

    /// Reachability check timeout in seconds
    pub const PROBE_TIMEOUT_SECS: u64 = 2;
}

/// Cloud API base URLs
pub mod endpoints {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
    pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
    pub const XAI_BASE_URL: &str = "https://api.x.ai/v1";
    pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
    pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Anthropic API version header value
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";
}

/// Build the main application directory path from a base directory
pub fn router_dir_path(base: &Path) -> PathBuf {
    base.join(ROUTER_DIR_NAME)
}

/// Build the usage state file path from a base directory
pub fn usage_file_path(base: &Path) -> PathBuf {
    router_dir_path(base).join(USAGE_FILE_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    router_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    router_dir_path(current_dir).join(CONFIG_FILE_NAME)
}

/// Resolve the user's home directory from the environment
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from)
}
