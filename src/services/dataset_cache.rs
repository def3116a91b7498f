use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::dataset::Dataset;
use crate::services::ingest_service;
use crate::utils::fingerprint::content_fingerprint;

/// Memo table of loaded datasets keyed by content fingerprint.
///
/// Only successful loads are stored. Entries leave on LRU eviction or through
/// `invalidate`/`clear`.
pub struct DatasetCache {
    entries: Mutex<LruCache<String, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(capacity: usize) -> AppResult<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| AppError::validation("cache capacity must be at least 1"))?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn get_or_load(&self, raw: &[u8]) -> AppResult<Arc<Dataset>> {
        let fingerprint = content_fingerprint(raw);
        if let Some(dataset) = self.get(&fingerprint)? {
            debug!(target: "app::ingest::cache", fingerprint = %fingerprint, "dataset cache hit");
            return Ok(dataset);
        }

        debug!(target: "app::ingest::cache", fingerprint = %fingerprint, "dataset cache miss");
        let dataset = Arc::new(ingest_service::load_with_fingerprint(raw, fingerprint.clone())?);

        let mut guard = self.lock()?;
        guard.put(fingerprint, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn get(&self, fingerprint: &str) -> AppResult<Option<Arc<Dataset>>> {
        let mut guard = self.lock()?;
        Ok(guard.get(fingerprint).cloned())
    }

    pub fn invalidate(&self, fingerprint: &str) -> AppResult<bool> {
        let mut guard = self.lock()?;
        let removed = guard.pop(fingerprint).is_some();
        if removed {
            debug!(target: "app::ingest::cache", fingerprint, "dataset cache entry invalidated");
        }
        Ok(removed)
    }

    /// Drop every entry, returning how many were held.
    pub fn clear(&self) -> AppResult<usize> {
        let mut guard = self.lock()?;
        let cleared = guard.len();
        guard.clear();
        debug!(target: "app::ingest::cache", cleared, "dataset cache cleared");
        Ok(cleared)
    }

    /// Change the table capacity, evicting least recently used entries if it shrinks.
    pub fn resize(&self, capacity: usize) -> AppResult<()> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| AppError::validation("cache capacity must be at least 1"))?;
        let mut guard = self.lock()?;
        guard.resize(capacity);
        debug!(target: "app::ingest::cache", capacity = capacity.get(), "dataset cache resized");
        Ok(())
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, LruCache<String, Arc<Dataset>>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::other("dataset cache lock poisoned"))
    }
}
