//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./llm-router.toml or ./.llm-router/config.toml
//! 2. User config: ~/.llm-router/config.toml
//! 3. System config: /etc/llm-router/config.toml
//! 4. Built-in defaults

use crate::{env, router::RouterConfig};
use anyhow::{Context, Result};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load an explicit config file, or discover one using the hierarchy
    pub fn load(config_override: Option<&Path>) -> Result<RouterConfig> {
        if let Some(path) = config_override {
            info!("Loading configuration override from: {:?}", path);
            return RouterConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load {}", path.display()));
        }
        Self::discover_config()
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<RouterConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return RouterConfig::from_toml_file(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()));
        }

        info!("No configuration file found, using defaults");
        Ok(RouterConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        Self::first_existing(Self::get_config_candidates())
    }

    fn first_existing(candidates: Vec<PathBuf>) -> Option<PathBuf> {
        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    pub fn get_config_candidates() -> Vec<PathBuf> {
        let current_dir = std_env::current_dir().ok();
        Self::candidates_for(current_dir.as_deref(), env::home_dir().as_deref())
    }

    fn candidates_for(current_dir: Option<&Path>, home_dir: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        // 1. Current directory: ./llm-router.toml, ./.llm-router/config.toml
        if let Some(current_dir) = current_dir {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(current_dir));
        }

        // 2. User config: ~/.llm-router/config.toml
        if let Some(home_dir) = home_dir {
            candidates.push(env::user_config_file_path(home_dir));
        }

        // 3. System config
        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/llm-router/config.toml"));

        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(
                PathBuf::from(program_data)
                    .join("llm-router")
                    .join(env::CONFIG_FILE_NAME),
            );
        }

        candidates
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf> {
        let home_dir = env::home_dir().context("Could not determine home directory")?;
        Self::create_default_config_in(&home_dir)
    }

    fn create_default_config_in(home_dir: &Path) -> Result<PathBuf> {
        let config_dir = env::router_dir_path(home_dir);
        let config_path = env::user_config_file_path(home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create configuration directory")?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if !config_path.exists() {
            RouterConfig::default().to_toml_file(&config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let candidates = Self::get_config_candidates();
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "EXISTS"
                } else {
                    "NOT A FILE"
                }
            } else {
                "NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_order() {
        let candidates = ConfigDiscovery::candidates_for(
            Some(Path::new("/work/project")),
            Some(Path::new("/home/user")),
        );

        assert_eq!(candidates[0], Path::new("/work/project/llm-router.toml"));
        assert_eq!(
            candidates[1],
            Path::new("/work/project/.llm-router/config.toml")
        );
        assert_eq!(candidates[2], Path::new("/home/user/.llm-router/config.toml"));
        #[cfg(unix)]
        assert_eq!(candidates[3], Path::new("/etc/llm-router/config.toml"));
    }

    #[test]
    fn test_first_existing_skips_missing_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let dir_candidate = temp_dir.path().join("as-dir.toml");
        fs::create_dir(&dir_candidate).unwrap();
        let file_candidate = temp_dir.path().join("llm-router.toml");
        fs::write(&file_candidate, "daily_budget = 3.0\n").unwrap();

        let found = ConfigDiscovery::first_existing(vec![
            temp_dir.path().join("missing.toml"),
            dir_candidate,
            file_candidate.clone(),
        ]);
        assert_eq!(found, Some(file_candidate.clone()));

        let config = ConfigDiscovery::load(Some(file_candidate.as_path())).unwrap();
        assert_eq!(config.daily_budget, 3.0);
    }

    #[test]
    fn test_load_override_reports_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "daily_budget = [").unwrap();

        let err = ConfigDiscovery::load(Some(path.as_path())).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
        assert!(ConfigDiscovery::load(Some(temp_dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_create_default_config() {
        let temp_dir = TempDir::new().unwrap();

        let path = ConfigDiscovery::create_default_config_in(temp_dir.path()).unwrap();
        assert_eq!(path, temp_dir.path().join(".llm-router/config.toml"));

        let loaded = RouterConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded, RouterConfig::default());

        // Existing file is left alone
        fs::write(&path, "daily_budget = 9.0\n").unwrap();
        ConfigDiscovery::create_default_config_in(temp_dir.path()).unwrap();
        assert_eq!(RouterConfig::from_toml_file(&path).unwrap().daily_budget, 9.0);
    }
}
