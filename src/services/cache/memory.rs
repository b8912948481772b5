use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

/// In-process cache backend.
///
/// Used when no Valkey URL is configured and by tests. Entries are not shared
/// between processes and disappear on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryCacheClient {
    // `None` deadline: the TTL is too long for `Instant` to represent.
    entries: Arc<Mutex<HashMap<String, (String, Option<Instant>)>>>,
}

impl MemoryCacheClient {
    pub fn new() -> Self {
        Self::default()
    }

    // Overwrite a raw value, bypassing serialization. Handy for corrupt-entry tests.
    #[cfg(test)]
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                (value.to_string(), Instant::now().checked_add(Duration::from_secs(3600))),
            );
        }
    }
}

fn is_live(deadline: &Option<Instant>, now: Instant) -> bool {
    deadline.is_none_or(|d| d > now)
}

fn poisoned() -> CacheError {
    CacheError::BackendCommand("memory cache lock poisoned".to_string())
}

#[async_trait]
impl CacheClient for MemoryCacheClient {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;

        match entries.get(key) {
            Some((_, deadline)) if !is_live(deadline, Instant::now()) => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        let now = Instant::now();

        // Pairs that never come back would otherwise stay forever.
        entries.retain(|_, (_, deadline)| is_live(deadline, now));
        entries.insert(key.to_string(), (value.to_string(), now.checked_add(ttl)));
        Ok(())
    }
}
