/*
 * Responsibility
 * - Turn the registry trust check (enabled + assigned) into a cached, TTL-bounded decision
 * - Resolve the owner when the scope needs it
 *
 * Rules
 * - Hit: no registry call (except a one-off owner lookup when an owner-scope request
 *   lands on an entry written without one)
 * - Miss or expired hit: enabled -> assigned -> owner (owner scope only), then write the entry
 * - Denials and backend failures are never written
 */
use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::services::auth::cache_store::{AuthCacheStore, CachedAuthorization};
use crate::services::auth::context::AuthorizationContext;
use crate::services::auth::error::AuthError;
use crate::services::cache::CacheError;
use crate::services::registry::Registry;

pub struct Authorizer {
    registry: Arc<dyn Registry>,
    cache: Arc<dyn AuthCacheStore>,
    ttl: Duration,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Authorizer {
    pub fn new(registry: Arc<dyn Registry>, cache: Arc<dyn AuthCacheStore>, ttl: Duration) -> Self {
        Self {
            registry,
            cache,
            ttl,
        }
    }

    /// Resolve `ctx` into an authorized context, or say why not.
    pub async fn authorize(
        &self,
        ctx: AuthorizationContext,
    ) -> Result<AuthorizationContext, AuthError> {
        let auth_id = ctx.auth_id();
        let now = chrono::Utc::now().timestamp();

        match self.cache.get_item(&auth_id).await {
            Ok(Some(record)) if !record.is_expired(now) => {
                debug!(auth_id = %auth_id, "authorization cache hit");
                return self.authorize_cached(ctx, record).await;
            }
            Ok(Some(record)) => {
                debug!(auth_id = %auth_id, expires_at = record.expires_at, "cached authorization expired");
            }
            Ok(None) => {
                debug!(auth_id = %auth_id, "authorization cache miss");
            }
            Err(CacheError::InvalidValue(e)) => {
                // Unreadable entry: recheck and overwrite it.
                warn!(auth_id = %auth_id, error = %e, "discarding unreadable cached authorization");
            }
            Err(e) => return Err(AuthError::CacheUnavailable(e)),
        }

        self.authorize_from_registry(ctx, auth_id, now).await
    }

    async fn authorize_cached(
        &self,
        mut ctx: AuthorizationContext,
        record: CachedAuthorization,
    ) -> Result<AuthorizationContext, AuthError> {
        if ctx.scope.requires_owner() && record.owner.is_none() {
            // The pair is trusted but was first seen under another scope.
            // Resolve the owner now and keep the original expiry.
            let owner = self.resolve_owner(&ctx.bot_id).await?;
            ctx.owner = Some(owner.clone());

            self.write(&CachedAuthorization {
                owner: Some(owner),
                ..record
            })
            .await;

            return Ok(ctx);
        }

        ctx.owner = record.owner;
        Ok(ctx)
    }

    async fn authorize_from_registry(
        &self,
        mut ctx: AuthorizationContext,
        auth_id: String,
        now: i64,
    ) -> Result<AuthorizationContext, AuthError> {
        if !self.registry.is_enabled_scanner(&ctx.scanner).await? {
            return Err(AuthError::ScannerNotEnabled);
        }

        if !self.registry.is_assigned(&ctx.scanner, &ctx.bot_id).await? {
            return Err(AuthError::NotAssigned);
        }

        if ctx.scope.requires_owner() {
            ctx.owner = Some(self.resolve_owner(&ctx.bot_id).await?);
        }

        let record = CachedAuthorization {
            auth_id,
            bot_id: ctx.bot_id.clone(),
            scanner: ctx.scanner.clone(),
            owner: ctx.owner.clone(),
            expires_at: now.saturating_add(self.ttl_seconds()),
        };
        self.write(&record).await;

        Ok(ctx)
    }

    fn ttl_seconds(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }

    async fn resolve_owner(&self, bot_id: &str) -> Result<String, AuthError> {
        let agent = self
            .registry
            .get_agent(bot_id)
            .await?
            .ok_or(AuthError::UnknownAgent)?;

        Ok(agent.owner.to_ascii_lowercase())
    }

    // The decision already came from the registry; a failed write only costs a
    // registry round trip next time.
    async fn write(&self, record: &CachedAuthorization) {
        if let Err(e) = self.cache.put_item(record).await {
            warn!(auth_id = %record.auth_id, error = %e, "failed to cache authorization");
        }
    }
}
