//! Cached, batching front end over a lookup service.
//!
//! A [`CachedClient`] remembers every key it has looked up, including keys
//! the service could not resolve, and only sends the keys it has never seen
//! to its [`BatchBackend`]. The cache is keyed by the raw query string; the
//! lookup options are not part of the key, so a caller that needs the same
//! key with different options must [`CachedClient::invalidate`] it first.

use crate::error::{ServiceError, ServiceResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A service that can answer many keys in one round trip.
#[async_trait]
pub trait BatchBackend: Send + Sync {
    /// What one key resolves to.
    type Value: Clone + Send + Sync + 'static;

    /// Request options forwarded with every batch.
    type Options: fmt::Debug + Send + Sync;

    /// Short service name used in logs and messages.
    fn service(&self) -> &'static str;

    /// Base URL of the deployment this backend talks to.
    fn base_url(&self) -> &str;

    /// Issue exactly one upstream request for `keys`.
    ///
    /// Keys missing from the reply may be omitted from the map; the cache
    /// treats them the same as an explicit `None`.
    async fn fetch_batch(
        &self,
        keys: &[String],
        options: &Self::Options,
    ) -> ServiceResult<HashMap<String, Option<Self::Value>>>;
}

/// In-memory cache over a [`BatchBackend`].
pub struct CachedClient<V, O> {
    backend: Arc<dyn BatchBackend<Value = V, Options = O>>,
    cache: DashMap<String, Option<V>>,
}

impl<V, O> CachedClient<V, O>
where
    V: Clone + Send + Sync + 'static,
    O: fmt::Debug + Send + Sync,
{
    pub fn new(backend: Arc<dyn BatchBackend<Value = V, Options = O>>) -> Self {
        Self {
            backend,
            cache: DashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.backend.base_url()
    }

    /// Look up every key, fetching only the ones not cached yet.
    ///
    /// Duplicates are collapsed; the returned map has one entry per distinct
    /// key. Every fetched key is cached, including those that came back
    /// empty. If the upstream call fails nothing is cached.
    pub async fn batch_lookup<S>(
        &self,
        keys: &[S],
        options: &O,
    ) -> ServiceResult<HashMap<String, Option<V>>>
    where
        S: AsRef<str> + Sync,
    {
        if keys.is_empty() {
            return Err(ServiceError::InvalidArgument(format!(
                "keys must not be empty when calling batch_lookup({:?}) on {}",
                options, self
            )));
        }

        let started = Instant::now();
        let distinct: BTreeSet<&str> = keys.iter().map(AsRef::as_ref).collect();

        let mut result = HashMap::with_capacity(distinct.len());
        let mut to_fetch = Vec::new();
        for key in distinct {
            let cached = self.cache.get(key).map(|entry| entry.value().clone());
            match cached {
                Some(value) => {
                    result.insert(key.to_string(), value);
                }
                None => to_fetch.push(key.to_string()),
            }
        }
        let cached_count = result.len();

        if !to_fetch.is_empty() {
            debug!(
                service = self.backend.service(),
                keys = ?to_fetch,
                options = ?options,
                "Calling {}",
                self
            );
            let mut fetched = self.backend.fetch_batch(&to_fetch, options).await?;
            for key in &to_fetch {
                let value = fetched.remove(key).flatten();
                self.cache.insert(key.clone(), value.clone());
                result.insert(key.clone(), value);
            }
        }

        info!(
            service = self.backend.service(),
            fetched = to_fetch.len(),
            cached = cached_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Looked up {} keys ({} cached) with {:?} on {}",
            to_fetch.len(),
            cached_count,
            options,
            self
        );

        Ok(result)
    }

    /// Look up a single key, from the cache when possible.
    pub async fn lookup_one(&self, key: &str, options: &O) -> ServiceResult<Option<V>> {
        let cached = self.cache.get(key).map(|entry| entry.value().clone());
        if let Some(value) = cached {
            return Ok(value);
        }

        let mut result = self.batch_lookup(&[key], options).await?;
        Ok(result.remove(key).flatten())
    }

    /// Forget a cached key. Returns whether it was cached.
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl<V, O> fmt::Display for CachedClient<V, O>
where
    V: Clone + Send + Sync + 'static,
    O: fmt::Debug + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.backend.service(), self.backend.base_url())
    }
}

impl<V, O> fmt::Debug for CachedClient<V, O>
where
    V: Clone + Send + Sync + 'static,
    O: fmt::Debug + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedClient")
            .field("service", &self.backend.service())
            .field("base_url", &self.backend.base_url())
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Resolves keys starting with `OK:` to their length; everything else is unknown.
    struct FakeBackend {
        calls: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchBackend for FakeBackend {
        type Value = usize;
        type Options = ();

        fn service(&self) -> &'static str {
            "Fake"
        }

        fn base_url(&self) -> &str {
            "http://fake"
        }

        async fn fetch_batch(
            &self,
            keys: &[String],
            _options: &(),
        ) -> ServiceResult<HashMap<String, Option<usize>>> {
            self.calls.lock().unwrap().push(keys.to_vec());
            if self.fail {
                return Err(ServiceError::RequestFailed {
                    service: "Fake",
                    url: "http://fake".into(),
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(keys
                .iter()
                .filter(|k| k.starts_with("OK:"))
                .map(|k| (k.clone(), Some(k.len())))
                .collect())
        }
    }

    fn client(backend: Arc<FakeBackend>) -> CachedClient<usize, ()> {
        CachedClient::new(backend)
    }

    #[tokio::test]
    async fn test_empty_keys_rejected() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());
        let keys: [&str; 0] = [];
        let err = client.batch_lookup(&keys, &()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_fetched_once() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());

        let result = client
            .batch_lookup(&["OK:a", "OK:a", "missing", "OK:a"], &())
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["OK:a"], Some(4));
        assert_eq!(result["missing"], None);
        assert_eq!(
            backend.calls(),
            vec![vec!["OK:a".to_string(), "missing".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_only_uncached_keys_are_fetched() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());

        client.batch_lookup(&["OK:a"], &()).await.unwrap();
        let result = client.batch_lookup(&["OK:a", "OK:bb"], &()).await.unwrap();

        assert_eq!(result["OK:a"], Some(4));
        assert_eq!(result["OK:bb"], Some(5));
        assert_eq!(
            backend.calls(),
            vec![vec!["OK:a".to_string()], vec!["OK:bb".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_fully_cached_batch_skips_upstream() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());

        client.batch_lookup(&["OK:a", "nope"], &()).await.unwrap();
        client.batch_lookup(&["nope", "OK:a"], &()).await.unwrap();

        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_one_uses_cache() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());

        assert_eq!(client.lookup_one("OK:x", &()).await.unwrap(), Some(4));
        assert_eq!(client.lookup_one("OK:x", &()).await.unwrap(), Some(4));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_results_are_cached() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());

        assert_eq!(client.lookup_one("NOPE:1", &()).await.unwrap(), None);
        assert!(client.is_cached("NOPE:1"));
        assert_eq!(client.lookup_one("NOPE:1", &()).await.unwrap(), None);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let backend = Arc::new(FakeBackend::new());
        let client = client(backend.clone());

        client.lookup_one("OK:x", &()).await.unwrap();
        assert!(client.invalidate("OK:x"));
        assert!(!client.invalidate("OK:x"));
        client.lookup_one("OK:x", &()).await.unwrap();

        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_batch_caches_nothing() {
        let backend = Arc::new(FakeBackend::failing());
        let client = client(backend.clone());

        let err = client.batch_lookup(&["OK:a", "OK:b"], &()).await.unwrap_err();
        assert!(matches!(err, ServiceError::RequestFailed { status: 500, .. }));
        assert_eq!(client.cached_len(), 0);
    }

    #[test]
    fn test_display_names_backend() {
        let client = client(Arc::new(FakeBackend::new()));
        assert_eq!(client.to_string(), "Fake(http://fake)");
    }
}
