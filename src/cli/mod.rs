//! CLI-specific functionality for the router
//!
//! This module contains argument parsing and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, Commands, SelectionArgs, parse_model_ref};
pub use config::ConfigDiscovery;
