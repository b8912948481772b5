/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, VALKEY_URL, scanner JWT 公開鍵など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // object storage
    pub database_url: String,
    pub run_migrations: bool,
    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,

    // registry (source of truth for scanner/bot trust)
    pub registry_database_url: String,

    // authorization cache
    pub valkey_url: Option<String>,
    pub auth_cache_prefix: String,
    pub auth_cache_ttl_seconds: u64,

    // scanner token verification
    pub scanner_jwt_public_key_pem: String,
    pub scanner_jwt_issuer: Option<String>,
    pub scanner_jwt_audience: Option<String>,
    pub scanner_jwt_leeway_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let run_migrations = match std::env::var("DATABASE_RUN_MIGRATIONS") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("DATABASE_RUN_MIGRATIONS"))?,
            Err(_) => true,
        };

        let body_limit_bytes = std::env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10 * 1024 * 1024);

        let request_timeout_seconds = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);

        let registry_database_url =
            non_empty_var("REGISTRY_DATABASE_URL").unwrap_or_else(|| database_url.clone());

        let valkey_url = non_empty_var("VALKEY_URL");

        let auth_cache_prefix =
            non_empty_var("AUTH_CACHE_PREFIX").unwrap_or_else(|| "botdb:auth".to_string());

        let auth_cache_ttl_seconds =
            parse_cache_ttl(non_empty_var("AUTH_CACHE_TTL_SECONDS").as_deref())?;

        let scanner_jwt_public_key_pem = std::env::var("SCANNER_JWT_PUBLIC_KEY_PEM")
            .map_err(|_| ConfigError::Missing("SCANNER_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let scanner_jwt_issuer = non_empty_var("SCANNER_JWT_ISSUER");
        let scanner_jwt_audience = non_empty_var("SCANNER_JWT_AUDIENCE");

        let scanner_jwt_leeway_seconds = std::env::var("SCANNER_JWT_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            run_migrations,
            body_limit_bytes,
            request_timeout_seconds,
            registry_database_url,
            valkey_url,
            auth_cache_prefix,
            auth_cache_ttl_seconds,
            scanner_jwt_public_key_pem,
            scanner_jwt_issuer,
            scanner_jwt_audience,
            scanner_jwt_leeway_seconds,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Entry expiry is stored as i64 epoch seconds, so the TTL must fit in one.
fn parse_cache_ttl(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(3600);
    };

    raw.parse::<u64>()
        .ok()
        .filter(|ttl| *ttl > 0 && i64::try_from(*ttl).is_ok())
        .ok_or(ConfigError::Invalid("AUTH_CACHE_TTL_SECONDS"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
