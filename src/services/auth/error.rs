use thiserror::Error;

use crate::services::auth::scanner_jwt::TokenError;
use crate::services::cache::CacheError;
use crate::services::registry::RegistryError;

/// Everything that can stop a request between the `Authorization` header and
/// a derived storage key.
///
/// The variants are for logs. Callers only ever see the coarse outcome from
/// [`AuthError::kind`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no Authorization header")]
    MissingCredential,
    #[error("invalid Authorization header")]
    MalformedCredential,
    #[error("invalid token: {0}")]
    InvalidToken(#[source] TokenError),
    #[error("token has no bot-id claim")]
    MissingIdentity,
    #[error("no key defined")]
    MissingKey,
    #[error("key must not contain '/'")]
    InvalidKey,

    #[error("scanner is not enabled")]
    ScannerNotEnabled,
    #[error("botId is not assigned to scanner")]
    NotAssigned,
    #[error("bot has no registered agent")]
    UnknownAgent,

    #[error("invalid scope: {0}")]
    InvalidScope(String),
    #[error("owner scope requested but owner is unresolved")]
    UnresolvedOwner,

    #[error("registry unavailable: {0}")]
    RegistryUnavailable(#[from] RegistryError),
    #[error("authorization cache unavailable: {0}")]
    CacheUnavailable(#[from] CacheError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    Denied,
    NotFound,
    Internal,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MissingKey => AuthErrorKind::NotFound,
            Self::RegistryUnavailable(_) | Self::CacheUnavailable(_) => AuthErrorKind::Internal,
            _ => AuthErrorKind::Denied,
        }
    }

    pub fn is_denial(&self) -> bool {
        self.kind() == AuthErrorKind::Denied
    }
}
