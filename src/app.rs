/*
 * Responsibility
 * - Config -> dependencies -> Router
 * - Middleware wiring (CORS / HTTP limits)
 * - axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{cors, http};
use crate::services::auth::{AuthCacheStore, ValkeyAuthStore, build_authorizer, build_token_verifier};
use crate::services::blob::PgBlobStore;
use crate::services::cache::MemoryCacheClient;
use crate::services::registry::PgRegistry;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bot_db=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        // Production: default behavior (stderr), the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting bot-db in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_pool(url: &str) -> Result<PgPool> {
    // Never log the URL, it may carry credentials.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;
    Ok(pool)
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = connect_pool(&config.database_url).await?;
    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&db).await?;
        tracing::info!("object store migrations applied");
    }

    let registry_db = if config.registry_database_url == config.database_url {
        db.clone()
    } else {
        connect_pool(&config.registry_database_url).await?
    };
    let registry = Arc::new(PgRegistry::new(registry_db));

    let cache: Arc<dyn AuthCacheStore> = match config.valkey_url.as_deref() {
        Some(url) => {
            let store = ValkeyAuthStore::connect(url, config.auth_cache_prefix.clone()).await?;
            tracing::info!(backend = store.backend_name(), "authorization cache connected");
            Arc::new(store)
        }
        None => {
            tracing::warn!(
                "VALKEY_URL is not set; authorization cache is in-process and not shared"
            );
            Arc::new(ValkeyAuthStore::new_with_cache(
                Arc::new(MemoryCacheClient::new()),
                config.auth_cache_prefix.clone(),
            ))
        }
    };

    let verifier = build_token_verifier(config)?;
    let authorizer = build_authorizer(config, registry, cache);
    let blobs = Arc::new(PgBlobStore::new(db));

    Ok(AppState::new(verifier, authorizer, blobs))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::v1::routes(state.clone()).with_state(state);

    let router = cors::apply(router, config);
    http::apply(router, http::HttpLimits::from_config(config))
}
