use std::{future::Future, pin::Pin, sync::Arc};

use crate::services::{
    auth::cache_store::store::{AuthCacheStore, CachedAuthorization},
    cache::{CacheClient, CacheError, ValkeyClient, client::ttl_seconds},
};

/// Valkey-backed authorization cache (Redis protocol).
///
/// One JSON document per AuthID; the key TTL tracks `expires_at` so the backend
/// drops stale decisions on its own.
#[derive(Clone)]
pub struct ValkeyAuthStore<C: CacheClient> {
    cache: Arc<C>,
    // Key prefix to avoid collisions across environments
    prefix: String,
}

impl ValkeyAuthStore<ValkeyClient> {
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = ValkeyClient::new(redis_url).await?;

        Ok(Self::new_with_cache(Arc::new(client), prefix))
    }
}

impl<C: CacheClient> ValkeyAuthStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, auth_id: &str) -> String {
        format!("{}:{}", self.prefix, auth_id)
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }
}

impl<C: CacheClient> AuthCacheStore for ValkeyAuthStore<C> {
    fn get_item<'a>(
        &'a self,
        auth_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<CachedAuthorization>, CacheError>> + Send + 'a>>
    {
        Box::pin(async move {
            let Some(raw) = self.cache.get_string(&self.key(auth_id)).await? else {
                return Ok(None);
            };

            let record: CachedAuthorization = serde_json::from_str(&raw)
                .map_err(|e| CacheError::InvalidValue(e.to_string()))?;

            Ok(Some(record))
        })
    }

    fn put_item<'a>(
        &'a self,
        record: &'a CachedAuthorization,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async move {
            let raw = serde_json::to_string(record)
                .map_err(|e| CacheError::InvalidValue(e.to_string()))?;

            let remaining = record.expires_at - chrono::Utc::now().timestamp();
            let ttl = ttl_seconds(remaining.max(1) as u64);

            self.cache
                .set_with_ttl(&self.key(&record.auth_id), &raw, ttl)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::MemoryCacheClient;

    fn record(owner: Option<&str>) -> CachedAuthorization {
        CachedAuthorization {
            auth_id: "0xbot|0xscanner".into(),
            bot_id: "0xBot".into(),
            scanner: "0xScanner".into(),
            owner: owner.map(str::to_string),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips_under_prefix() {
        let cache = Arc::new(MemoryCacheClient::new());
        let store = ValkeyAuthStore::new_with_cache(cache.clone(), "test:auth");
        let rec = record(Some("0xowner"));

        store.put_item(&rec).await.unwrap();

        assert_eq!(store.get_item("0xbot|0xscanner").await.unwrap(), Some(rec));
        assert!(
            cache
                .get_string("test:auth:0xbot|0xscanner")
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn miss_is_none() {
        let store = ValkeyAuthStore::new_with_cache(Arc::new(MemoryCacheClient::new()), "p");
        assert_eq!(store.get_item("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_without_owner_field_decodes() {
        let cache = Arc::new(MemoryCacheClient::new());
        cache.insert_raw(
            "p:a|b",
            r#"{"auth_id":"a|b","bot_id":"a","scanner":"b","expires_at":1}"#,
        );
        let store = ValkeyAuthStore::new_with_cache(cache, "p");

        let rec = store.get_item("a|b").await.unwrap().expect("record");
        assert_eq!(rec.owner, None);
        assert!(rec.is_expired(1));
    }

    #[tokio::test]
    async fn corrupt_value_is_an_error_not_a_miss() {
        let cache = Arc::new(MemoryCacheClient::new());
        cache.insert_raw("p:a|b", "{not json");
        let store = ValkeyAuthStore::new_with_cache(cache, "p");

        assert!(matches!(
            store.get_item("a|b").await,
            Err(CacheError::InvalidValue(_))
        ));
    }
}
