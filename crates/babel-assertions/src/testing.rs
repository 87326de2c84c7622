//! In-process NodeNorm and NameRes stand-ins for tests.

use async_trait::async_trait;
use babel_services::{
    BatchBackend, LookupOptions, LookupResult, NameResClient, NodeIdentifier, NodeNormClient,
    NormalizeOptions, NormalizedNode, ServiceError, ServiceResult,
};
use serde_json::Map;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Build a normalized node with one equivalent identifier.
pub fn node(identifier: &str, label: &str, types: &[&str]) -> NormalizedNode {
    let id = NodeIdentifier {
        identifier: identifier.to_string(),
        label: Some(label.to_string()),
        description: None,
        extra: Map::new(),
    };
    NormalizedNode {
        equivalent_identifiers: vec![id.clone()],
        id,
        types: types.iter().map(|t| t.to_string()).collect(),
        extra: Map::new(),
    }
}

/// Build one NameRes hit.
pub fn hit(curie: &str, label: &str) -> LookupResult {
    LookupResult {
        curie: curie.to_string(),
        label: label.to_string(),
        synonyms: Vec::new(),
        types: Vec::new(),
        score: None,
        extra: Map::new(),
    }
}

/// NodeNorm backed by a fixed table; records every batch it is asked for.
#[derive(Default)]
pub struct StaticNodeNorm {
    nodes: HashMap<String, NormalizedNode>,
    calls: Mutex<Vec<(Vec<String>, NormalizeOptions)>>,
    fail_with_status: Option<u16>,
}

impl StaticNodeNorm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, curie: &str, node: NormalizedNode) -> Self {
        self.nodes.insert(curie.to_string(), node);
        self
    }

    /// Every request fails with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(Vec<String>, NormalizeOptions)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BatchBackend for StaticNodeNorm {
    type Value = NormalizedNode;
    type Options = NormalizeOptions;

    fn service(&self) -> &'static str {
        "NodeNorm"
    }

    fn base_url(&self) -> &str {
        "http://nodenorm.test"
    }

    async fn fetch_batch(
        &self,
        keys: &[String],
        options: &NormalizeOptions,
    ) -> ServiceResult<HashMap<String, Option<NormalizedNode>>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((keys.to_vec(), options.clone()));
        }
        if let Some(status) = self.fail_with_status {
            return Err(ServiceError::RequestFailed {
                service: "NodeNorm",
                url: "http://nodenorm.test/get_normalized_nodes".to_string(),
                status,
                body: String::new(),
            });
        }
        Ok(keys
            .iter()
            .map(|k| (k.clone(), self.nodes.get(k).cloned()))
            .collect())
    }
}

/// NameRes backed by a fixed table of ranked results.
#[derive(Default)]
pub struct StaticNameRes {
    results: HashMap<String, Vec<LookupResult>>,
    calls: Mutex<Vec<(Vec<String>, LookupOptions)>>,
}

impl StaticNameRes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, results: Vec<LookupResult>) -> Self {
        self.results.insert(query.to_string(), results);
        self
    }

    pub fn calls(&self) -> Vec<(Vec<String>, LookupOptions)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BatchBackend for StaticNameRes {
    type Value = Vec<LookupResult>;
    type Options = LookupOptions;

    fn service(&self) -> &'static str {
        "NameRes"
    }

    fn base_url(&self) -> &str {
        "http://nameres.test"
    }

    async fn fetch_batch(
        &self,
        keys: &[String],
        options: &LookupOptions,
    ) -> ServiceResult<HashMap<String, Option<Vec<LookupResult>>>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((keys.to_vec(), options.clone()));
        }
        let limit = options.limit as usize;
        Ok(keys
            .iter()
            .map(|k| {
                let ranked = self
                    .results
                    .get(k)
                    .map(|r| r.iter().take(limit).cloned().collect());
                (k.clone(), ranked)
            })
            .collect())
    }
}

pub fn nodenorm_client(backend: Arc<StaticNodeNorm>) -> NodeNormClient {
    NodeNormClient::new(backend)
}

pub fn nameres_client(backend: Arc<StaticNameRes>) -> NameResClient {
    NameResClient::new(backend)
}
