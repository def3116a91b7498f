use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::dataset::Dataset;
use crate::services::dataset_cache::DatasetCache;

/// Per-upload sessions. Each session holds its own dataset handle; identical
/// uploads in different sessions share one immutable `Arc<Dataset>` through
/// the memo table.
pub struct SessionService {
    cache: Arc<DatasetCache>,
    sessions: RwLock<HashMap<String, Arc<Dataset>>>,
}

impl SessionService {
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self {
            cache,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn open(&self, raw: &[u8]) -> AppResult<(String, Arc<Dataset>)> {
        let dataset = self.cache.get_or_load(raw)?;
        let session_id = Uuid::new_v4().to_string();

        self.sessions
            .write()
            .map_err(|_| AppError::other("session lock poisoned"))?
            .insert(session_id.clone(), Arc::clone(&dataset));

        info!(
            target: "app::session",
            %session_id,
            fingerprint = %dataset.fingerprint(),
            records = dataset.len(),
            "session opened"
        );
        Ok((session_id, dataset))
    }

    /// Swap the dataset of an existing session for a new upload.
    pub fn replace(&self, session_id: &str, raw: &[u8]) -> AppResult<Arc<Dataset>> {
        if !self.contains(session_id)? {
            return Err(AppError::session_not_found(session_id));
        }
        let dataset = self.cache.get_or_load(raw)?;

        // existence is re-checked under the same guard as the store
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AppError::other("session lock poisoned"))?;
        match sessions.get_mut(session_id) {
            Some(slot) => *slot = Arc::clone(&dataset),
            None => return Err(AppError::session_not_found(session_id)),
        }
        drop(sessions);
        debug!(target: "app::session", session_id, fingerprint = %dataset.fingerprint(), "session dataset replaced");
        Ok(dataset)
    }

    pub fn dataset(&self, session_id: &str) -> AppResult<Arc<Dataset>> {
        self.sessions
            .read()
            .map_err(|_| AppError::other("session lock poisoned"))?
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::session_not_found(session_id))
    }

    pub fn close(&self, session_id: &str) -> AppResult<()> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| AppError::other("session lock poisoned"))?
            .remove(session_id);
        match removed {
            Some(_) => {
                debug!(target: "app::session", session_id, "session closed");
                Ok(())
            }
            None => Err(AppError::session_not_found(session_id)),
        }
    }

    pub fn contains(&self, session_id: &str) -> AppResult<bool> {
        Ok(self
            .sessions
            .read()
            .map_err(|_| AppError::other("session lock poisoned"))?
            .contains_key(session_id))
    }

    pub fn count(&self) -> AppResult<usize> {
        Ok(self
            .sessions
            .read()
            .map_err(|_| AppError::other("session lock poisoned"))?
            .len())
    }
}
