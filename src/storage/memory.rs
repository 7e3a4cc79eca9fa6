use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{LogStore, StorageError, StoredLog};
use crate::models::LogMetadata;

#[derive(Clone, Debug)]
struct Entry {
    content: Vec<u8>,
    metadata: LogMetadata,
    expires_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, Entry>,
    clock_offset: Duration,
    fail_writes: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            clock_offset: Duration::zero(),
            fail_writes: false,
        }
    }
}

/// In-memory [`LogStore`] with simulated expiry.
///
/// Time only moves forward through [`MemoryLogStore::advance`] on top of the
/// wall clock, so tests can expire records without sleeping.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    inner: Mutex<Inner>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the store's clock forward.
    pub fn advance(&self, by: Duration) {
        let mut inner = self.lock();
        inner.clock_offset = inner.clock_offset + by;
    }

    /// Make every subsequent `put` and `delete` fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let inner = self.lock();
        let now = Utc::now() + inner.clock_offset;
        inner.entries.values().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait(?Send)]
impl LogStore for MemoryLogStore {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        ttl_seconds: u64,
        metadata: &LogMetadata,
    ) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Backend("simulated write failure".to_string()));
        }
        let expires_at = Utc::now() + inner.clock_offset + Duration::seconds(ttl_seconds as i64);
        inner.entries.insert(
            key.to_string(),
            Entry {
                content: content.to_vec(),
                metadata: metadata.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get_with_metadata(&self, key: &str) -> Result<StoredLog, StorageError> {
        let mut inner = self.lock();
        let now = Utc::now() + inner.clock_offset;
        let expired = match inner.entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                return Ok((Some(entry.content.clone()), Some(entry.metadata.clone())));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            inner.entries.remove(key);
        }
        Ok((None, None))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Backend("simulated delete failure".to_string()));
        }
        inner.entries.remove(key);
        Ok(())
    }
}
