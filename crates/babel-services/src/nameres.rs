//! NameRes (name resolver) backend.

use crate::cache::{BatchBackend, CachedClient};
use crate::error::ServiceResult;
use crate::http::{normalize_base_url, post_json};
use crate::types::{LookupOptions, LookupResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;

/// Cached NameRes client. Each query maps to its ranked result list.
pub type NameResClient = CachedClient<Vec<LookupResult>, LookupOptions>;

/// Talks to `POST {base}/bulk-lookup`.
pub struct NameResBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct BulkLookupRequest<'a> {
    strings: &'a [String],
    #[serde(flatten)]
    options: &'a LookupOptions,
}

impl NameResBackend {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bulk-lookup", self.base_url)
    }
}

#[async_trait]
impl BatchBackend for NameResBackend {
    type Value = Vec<LookupResult>;
    type Options = LookupOptions;

    fn service(&self) -> &'static str {
        "NameRes"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_batch(
        &self,
        keys: &[String],
        options: &LookupOptions,
    ) -> ServiceResult<HashMap<String, Option<Vec<LookupResult>>>> {
        let request = BulkLookupRequest {
            strings: keys,
            options,
        };
        let results: HashMap<String, Vec<LookupResult>> =
            post_json(&self.client, self.service(), &self.endpoint(), &request).await?;
        Ok(results.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

impl NameResClient {
    /// Ranked results for one query; empty when NameRes found nothing.
    pub async fn lookup(
        &self,
        query: &str,
        options: &LookupOptions,
    ) -> ServiceResult<Vec<LookupResult>> {
        Ok(self.lookup_one(query, options).await?.unwrap_or_default())
    }
}
