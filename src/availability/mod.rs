//! Provider availability probing.
//!
//! Cloud providers are available when a usable credential is configured; local
//! providers when their service answers a short status request. Unavailability
//! is an ordinary outcome, so probing never returns an error to the caller.

pub mod credentials;

#[cfg(test)]
mod tests;

pub use credentials::{CredentialSource, EnvCredentials, MapCredentials, credential_is_usable};

use crate::catalog::Provider;
use crate::env;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Which providers can currently be called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderAvailability {
    providers: BTreeMap<Provider, bool>,
}

impl ProviderAvailability {
    /// Mark exactly the given providers as available.
    pub fn only(available: &[Provider]) -> Self {
        Provider::ALL
            .into_iter()
            .map(|p| (p, available.contains(&p)))
            .collect()
    }

    pub fn is_available(&self, provider: Provider) -> bool {
        self.providers.get(&provider).copied().unwrap_or(false)
    }

    pub fn available_providers(&self) -> Vec<Provider> {
        self.providers
            .iter()
            .filter(|(_, up)| **up)
            .map(|(p, _)| *p)
            .collect()
    }

    /// Whether any local, zero-cost-capable provider is up.
    pub fn has_local(&self) -> bool {
        self.available_providers().iter().any(|p| p.is_local())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Provider, bool)> + '_ {
        self.providers.iter().map(|(p, up)| (*p, *up))
    }
}

impl FromIterator<(Provider, bool)> for ProviderAvailability {
    fn from_iter<I: IntoIterator<Item = (Provider, bool)>>(iter: I) -> Self {
        Self {
            providers: iter.into_iter().collect(),
        }
    }
}

/// Reason a local service check failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed model list: {0}")]
    Malformed(String),
    #[error("service is up but has no models")]
    NoModels,
}

/// Body of `GET /api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Debug, Deserialize)]
struct TaggedModel {
    name: String,
}

/// Reachability check for a local inference service.
pub trait ReachabilityCheck: Send + Sync {
    fn check(&self, provider: Provider) -> BoxFuture<'_, Result<(), ProbeError>>;
}

/// Issues a GET against `<base_url>/api/tags` with a short timeout. The
/// service counts only when it lists at least one pulled model.
pub struct HttpReachability {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpReachability {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        // Local services are never reached through an HTTP proxy
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    fn tags_url(&self) -> Result<url::Url, ProbeError> {
        let mut base = url::Url::parse(&self.base_url)
            .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(env::local::OLLAMA_TAGS_PATH)
            .map_err(|e| ProbeError::InvalidUrl(e.to_string()))
    }
}

impl Default for HttpReachability {
    fn default() -> Self {
        Self::new(
            env::local::OLLAMA_BASE_URL,
            Duration::from_secs(env::local::PROBE_TIMEOUT_SECS),
        )
    }
}

impl ReachabilityCheck for HttpReachability {
    fn check(&self, _provider: Provider) -> BoxFuture<'_, Result<(), ProbeError>> {
        Box::pin(async move {
            let url = self.tags_url()?;
            let response = self
                .client
                .get(url)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| ProbeError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProbeError::Status(status.as_u16()));
            }

            let tags: TagsResponse = response
                .json()
                .await
                .map_err(|e| ProbeError::Malformed(e.to_string()))?;
            if tags.models.is_empty() {
                return Err(ProbeError::NoModels);
            }
            debug!(
                "Local models: {:?}",
                tags.models.iter().map(|m| m.name.as_str()).collect::<Vec<_>>()
            );
            Ok(())
        })
    }
}

/// Computes a [`ProviderAvailability`] snapshot.
pub struct AvailabilityProber {
    credentials: Arc<dyn CredentialSource>,
    local: Arc<dyn ReachabilityCheck>,
}

impl AvailabilityProber {
    pub fn new(credentials: Arc<dyn CredentialSource>, local: Arc<dyn ReachabilityCheck>) -> Self {
        Self { credentials, local }
    }

    /// Probe every known provider. Never fails.
    pub async fn probe(&self) -> ProviderAvailability {
        let mut availability = Vec::with_capacity(Provider::ALL.len());

        for provider in Provider::ALL {
            let up = if provider.is_local() {
                self.probe_local(provider).await
            } else {
                self.probe_credential(provider)
            };
            availability.push((provider, up));
        }

        let availability: ProviderAvailability = availability.into_iter().collect();
        info!(
            "Available providers: {:?}",
            availability
                .available_providers()
                .iter()
                .map(Provider::as_str)
                .collect::<Vec<_>>()
        );
        availability
    }

    fn probe_credential(&self, provider: Provider) -> bool {
        let Some(var) = provider.api_key_var() else {
            return false;
        };
        let usable = self
            .credentials
            .get(&var)
            .is_some_and(|value| credential_is_usable(&value));
        debug!("Credential {} for {}: usable={}", var, provider, usable);
        usable
    }

    async fn probe_local(&self, provider: Provider) -> bool {
        match self.local.check(provider).await {
            Ok(()) => {
                debug!("Local service for {} is reachable", provider);
                true
            }
            Err(e) => {
                debug!("Local service for {} unavailable: {}", provider, e);
                false
            }
        }
    }
}
