//! Per-URL registry of cached clients.
//!
//! Every NodeNorm or NameRes URL gets exactly one cached client for the
//! lifetime of the registry, so test cases that target the same deployment
//! share one cache. Registries are plain values: two registries never share
//! cache entries.

use crate::error::ServiceResult;
use crate::http::normalize_base_url;
use crate::nameres::{NameResBackend, NameResClient};
use crate::nodenorm::{NodeNormBackend, NodeNormClient};
use dashmap::DashMap;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout for upstream calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hands out one shared client per service URL.
pub struct ClientRegistry {
    http: Client,
    nodenorm: DashMap<String, Arc<NodeNormClient>>,
    nameres: DashMap<String, Arc<NameResClient>>,
}

impl ClientRegistry {
    /// Create a registry whose HTTP client uses `timeout` per request.
    pub fn new(timeout: Duration) -> ServiceResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(http))
    }

    pub fn with_http_client(http: Client) -> Self {
        Self {
            http,
            nodenorm: DashMap::new(),
            nameres: DashMap::new(),
        }
    }

    /// The NodeNorm client for `url`, created on first use.
    pub fn nodenorm(&self, url: &str) -> Arc<NodeNormClient> {
        let key = normalize_base_url(url);
        self.nodenorm
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(url = %key, "Creating NodeNorm client");
                Arc::new(NodeNormClient::new(Arc::new(NodeNormBackend::new(
                    self.http.clone(),
                    &key,
                ))))
            })
            .clone()
    }

    /// The NameRes client for `url`, created on first use.
    pub fn nameres(&self, url: &str) -> Arc<NameResClient> {
        let key = normalize_base_url(url);
        self.nameres
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(url = %key, "Creating NameRes client");
                Arc::new(NameResClient::new(Arc::new(NameResBackend::new(
                    self.http.clone(),
                    &key,
                ))))
            })
            .clone()
    }

    pub fn nodenorm_count(&self) -> usize {
        self.nodenorm.len()
    }

    pub fn nameres_count(&self) -> usize {
        self.nameres.len()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::with_http_client(Client::new())
    }
}
