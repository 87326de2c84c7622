//! Babel Validation service clients
//!
//! Cached, batching clients for the two services the validation suite
//! checks:
//!
//! - **NodeNorm**: normalizes CURIEs to their canonical clique
//!   (`POST /get_normalized_nodes`)
//! - **NameRes**: ranks CURIEs for a free-text query (`POST /bulk-lookup`)
//!
//! Lookups go through a [`CachedClient`], which only contacts the service for
//! keys it has never seen and also remembers keys that did not resolve.
//! [`ClientRegistry`] keeps one client per service URL.

#![deny(unsafe_code)]

pub mod cache;
pub mod error;
pub mod http;
pub mod nameres;
pub mod nodenorm;
pub mod registry;
pub mod types;

pub use cache::{BatchBackend, CachedClient};
pub use error::{ServiceError, ServiceResult};
pub use nameres::{NameResBackend, NameResClient};
pub use nodenorm::{NodeNormBackend, NodeNormClient};
pub use registry::{ClientRegistry, DEFAULT_TIMEOUT};
pub use types::{LookupOptions, LookupResult, NodeIdentifier, NormalizeOptions, NormalizedNode};
