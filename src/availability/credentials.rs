use crate::env;
use std::collections::HashMap;

/// Key-value lookup for provider credentials and overrides.
pub trait CredentialSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory credentials, useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MapCredentials {
    values: HashMap<String, String>,
}

impl MapCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialSource for MapCredentials {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// A credential is usable when, after trimming, it is non-empty and not a
/// placeholder copied from an example `.env` file.
pub fn credential_is_usable(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && value != env::vars::PLACEHOLDER_API_KEY
        && !value.starts_with("your_")
}
