/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{Authorizer, AuthCacheStore, JwtScannerVerifier};
use crate::services::registry::Registry;

pub fn build_token_verifier(config: &Config) -> anyhow::Result<Arc<JwtScannerVerifier>> {
    let verifier = JwtScannerVerifier::new(
        &config.scanner_jwt_public_key_pem,
        config.scanner_jwt_issuer.as_deref(),
        config.scanner_jwt_audience.as_deref(),
        config.scanner_jwt_leeway_seconds,
    )
    .map_err(anyhow::Error::msg)?;

    Ok(Arc::new(verifier))
}

pub fn build_authorizer(
    config: &Config,
    registry: Arc<dyn Registry>,
    cache: Arc<dyn AuthCacheStore>,
) -> Arc<Authorizer> {
    Arc::new(Authorizer::new(
        registry,
        cache,
        std::time::Duration::from_secs(config.auth_cache_ttl_seconds),
    ))
}
