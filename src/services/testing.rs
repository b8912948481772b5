//! In-memory fakes for the external collaborators (verifier, registry, stores).
use async_trait::async_trait;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use crate::services::auth::cache_store::{AuthCacheStore, CachedAuthorization};
use crate::services::auth::scanner_jwt::{TokenError, TokenVerifier, VerifiedScannerToken};
use crate::services::blob::{BlobStore, StoreError};
use crate::services::cache::CacheError;
use crate::services::registry::{Agent, Registry, RegistryError};

/// Verifier that accepts any token and returns a fixed identity.
pub struct FakeVerifier {
    result: Option<VerifiedScannerToken>,
    seen: Mutex<Vec<String>>,
}

impl FakeVerifier {
    pub fn valid(scanner: &str, bot_id: &str) -> Self {
        Self::with(Some(VerifiedScannerToken {
            scanner: scanner.to_string(),
            bot_id: Some(bot_id.to_string()),
        }))
    }

    pub fn without_bot(scanner: &str) -> Self {
        Self::with(Some(VerifiedScannerToken {
            scanner: scanner.to_string(),
            bot_id: None,
        }))
    }

    pub fn failing() -> Self {
        Self::with(None)
    }

    fn with(result: Option<VerifiedScannerToken>) -> Self {
        Self {
            result,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl TokenVerifier for FakeVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedScannerToken, TokenError> {
        self.seen.lock().unwrap().push(token.to_string());
        self.result
            .clone()
            .ok_or(TokenError::EmptyClaim("sub"))
    }
}

/// Registry with switchable answers and per-method call counters.
pub struct FakeRegistry {
    enabled: AtomicBool,
    assigned: AtomicBool,
    failing: AtomicBool,
    owner: Mutex<Option<String>>,
    enabled_calls: AtomicUsize,
    assigned_calls: AtomicUsize,
    agent_calls: AtomicUsize,
    // Arguments as received, one entry per call.
    seen_args: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn trusting(owner: Option<&str>) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            assigned: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            owner: Mutex::new(owner.map(str::to_string)),
            enabled_calls: AtomicUsize::new(0),
            assigned_calls: AtomicUsize::new(0),
            agent_calls: AtomicUsize::new(0),
            seen_args: Mutex::new(Vec::new()),
        }
    }

    pub fn set_enabled(&self, v: bool) {
        self.enabled.store(v, Ordering::SeqCst);
    }

    pub fn set_assigned(&self, v: bool) {
        self.assigned.store(v, Ordering::SeqCst);
    }

    pub fn set_failing(&self, v: bool) {
        self.failing.store(v, Ordering::SeqCst);
    }

    pub fn set_owner(&self, owner: Option<&str>) {
        *self.owner.lock().unwrap() = owner.map(str::to_string);
    }

    /// (is_enabled_scanner, is_assigned, get_agent)
    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.enabled_calls.load(Ordering::SeqCst),
            self.assigned_calls.load(Ordering::SeqCst),
            self.agent_calls.load(Ordering::SeqCst),
        )
    }

    /// `"enabled(<scanner>)"`, `"assigned(<scanner>, <bot>)"`, `"agent(<bot>)"` in call order.
    pub fn seen_args(&self) -> Vec<String> {
        self.seen_args.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.seen_args.lock().unwrap().push(call);
    }

    fn check_failing(&self) -> Result<(), RegistryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RegistryError::Backend("registry unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn is_enabled_scanner(&self, scanner: &str) -> Result<bool, RegistryError> {
        self.enabled_calls.fetch_add(1, Ordering::SeqCst);
        self.record(format!("enabled({scanner})"));
        self.check_failing()?;
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn is_assigned(&self, scanner: &str, bot_id: &str) -> Result<bool, RegistryError> {
        self.assigned_calls.fetch_add(1, Ordering::SeqCst);
        self.record(format!("assigned({scanner}, {bot_id})"));
        self.check_failing()?;
        Ok(self.assigned.load(Ordering::SeqCst))
    }

    async fn get_agent(&self, bot_id: &str) -> Result<Option<Agent>, RegistryError> {
        self.agent_calls.fetch_add(1, Ordering::SeqCst);
        self.record(format!("agent({bot_id})"));
        self.check_failing()?;
        let owner = self.owner.lock().unwrap().clone();
        Ok(owner.map(|owner| Agent { owner }))
    }
}

/// Authorization cache whose backend is always down.
pub struct FailingAuthCache;

impl AuthCacheStore for FailingAuthCache {
    fn get_item<'a>(
        &'a self,
        _auth_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<CachedAuthorization>, CacheError>> + Send + 'a>>
    {
        Box::pin(async { Err(CacheError::BackendConnection("connection refused".into())) })
    }

    fn put_item<'a>(
        &'a self,
        _record: &'a CachedAuthorization,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async { Err(CacheError::BackendConnection("connection refused".into())) })
    }
}

/// Authorization cache that reads fine (always a miss) but cannot write.
pub struct WriteFailingAuthCache;

impl AuthCacheStore for WriteFailingAuthCache {
    fn get_item<'a>(
        &'a self,
        _auth_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<CachedAuthorization>, CacheError>> + Send + 'a>>
    {
        Box::pin(async { Ok(None) })
    }

    fn put_item<'a>(
        &'a self,
        _record: &'a CachedAuthorization,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async { Err(CacheError::BackendCommand("READONLY replica".into())) })
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl MemoryBlobStore {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn set_failing(&self, v: bool) {
        self.failing.store(v, Ordering::SeqCst);
    }

    fn check_failing(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_failing()?;
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, body: &[u8]) -> Result<(), StoreError> {
        self.check_failing()?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.check_failing()?;
        Ok(self.objects.lock().unwrap().remove(key).is_some())
    }
}
