//! # Log Storage
//!
//! The service keeps no state of its own: every record lives in an external
//! key-value store that owns durability and TTL-based expiry. [`LogStore`]
//! is the contract the handlers depend on.
//!
//! ## Implementations
//!
//! - [`KvLogStore`]: Cloudflare Workers KV, used in production
//! - [`MemoryLogStore`]: in-process map with simulated expiry, used in tests

use async_trait::async_trait;
use thiserror::Error;

use crate::models::LogMetadata;

pub mod kv;
pub mod memory;

pub use kv::KvLogStore;
pub use memory::MemoryLogStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Content and metadata of a key, either of which may be absent.
pub type StoredLog = (Option<Vec<u8>>, Option<LogMetadata>);

/// Key-value store with per-key expiry and attached metadata.
///
/// Keys are written once and never overwritten by the service, so
/// implementations need no compare-and-swap semantics.
#[async_trait(?Send)]
pub trait LogStore {
    /// Store `content` under `key`, removing it after `ttl_seconds`.
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        ttl_seconds: u64,
        metadata: &LogMetadata,
    ) -> Result<(), StorageError>;

    /// Fetch content and metadata. Expired keys read as absent.
    ///
    /// Reads may be served from a short-lived edge cache.
    async fn get_with_metadata(&self, key: &str) -> Result<StoredLog, StorageError>;

    /// Remove a key. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
