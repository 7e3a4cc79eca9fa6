use async_trait::async_trait;
use worker::kv::{KvError, KvStore};

use super::{LogStore, StorageError, StoredLog};
use crate::constants::DOWNLOAD_CACHE_TTL;
use crate::models::LogMetadata;

/// [`LogStore`] backed by a Workers KV namespace.
pub struct KvLogStore {
    kv: KvStore,
}

impl KvLogStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }
}

// `KvError` only implements `Debug`.
impl From<KvError> for StorageError {
    fn from(error: KvError) -> Self {
        StorageError::Backend(format!("{:?}", error))
    }
}

#[async_trait(?Send)]
impl LogStore for KvLogStore {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        ttl_seconds: u64,
        metadata: &LogMetadata,
    ) -> Result<(), StorageError> {
        self.kv
            .put_bytes(key, content)?
            .expiration_ttl(ttl_seconds)
            .metadata(metadata)?
            .execute()
            .await?;
        Ok(())
    }

    async fn get_with_metadata(&self, key: &str) -> Result<StoredLog, StorageError> {
        let stored = self
            .kv
            .get(key)
            .cache_ttl(DOWNLOAD_CACHE_TTL)
            .bytes_with_metadata::<LogMetadata>()
            .await?;
        Ok(stored)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.kv.delete(key).await?;
        Ok(())
    }
}
