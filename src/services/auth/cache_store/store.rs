use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};

use crate::services::cache::CacheError;

/// Persisted authorization decision for one (bot, scanner) pair.
///
/// Only written after the registry said yes; a denial never produces a record.
/// `owner` is `None` until some owner-scope request needed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAuthorization {
    pub auth_id: String,
    pub bot_id: String,
    pub scanner: String,
    #[serde(default)]
    pub owner: Option<String>,
    // epoch seconds
    pub expires_at: i64,
}

impl CachedAuthorization {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Point lookup / point write over the authorization cache table.
///
/// - `get_item`: `Ok(None)` on a miss
/// - `put_item`: overwrite, last writer wins
/// - `Err(_)`: backend failure, never to be read as a denial
pub trait AuthCacheStore: Send + Sync {
    fn get_item<'a>(
        &'a self,
        auth_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<CachedAuthorization>, CacheError>> + Send + 'a>>;

    fn put_item<'a>(
        &'a self,
        record: &'a CachedAuthorization,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;
}
