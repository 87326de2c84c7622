//! NodeNorm (node normalizer) backend.

use crate::cache::{BatchBackend, CachedClient};
use crate::error::ServiceResult;
use crate::http::{normalize_base_url, post_json};
use crate::types::{NormalizeOptions, NormalizedNode};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;

/// Cached NodeNorm client.
pub type NodeNormClient = CachedClient<NormalizedNode, NormalizeOptions>;

/// Talks to `POST {base}/get_normalized_nodes`.
pub struct NodeNormBackend {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct NormalizeRequest<'a> {
    curies: &'a [String],
    #[serde(flatten)]
    options: &'a NormalizeOptions,
}

impl NodeNormBackend {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/get_normalized_nodes", self.base_url)
    }
}

#[async_trait]
impl BatchBackend for NodeNormBackend {
    type Value = NormalizedNode;
    type Options = NormalizeOptions;

    fn service(&self) -> &'static str {
        "NodeNorm"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_batch(
        &self,
        keys: &[String],
        options: &NormalizeOptions,
    ) -> ServiceResult<HashMap<String, Option<NormalizedNode>>> {
        let request = NormalizeRequest {
            curies: keys,
            options,
        };
        post_json(&self.client, self.service(), &self.endpoint(), &request).await
    }
}

impl NodeNormClient {
    /// Normalize several CURIEs with default options.
    pub async fn normalize_curies<S>(
        &self,
        curies: &[S],
    ) -> ServiceResult<HashMap<String, Option<NormalizedNode>>>
    where
        S: AsRef<str> + Sync,
    {
        self.batch_lookup(curies, &NormalizeOptions::default()).await
    }

    /// Normalize one CURIE with default options.
    pub async fn normalize_curie(&self, curie: &str) -> ServiceResult<Option<NormalizedNode>> {
        self.lookup_one(curie, &NormalizeOptions::default()).await
    }
}
