pub mod authorizer;
pub mod cache_store;
pub mod context;
pub mod error;
pub mod factory;
pub mod identity;
pub mod keys;
pub mod scanner_jwt;

pub use authorizer::Authorizer;
pub use cache_store::{AuthCacheStore, ValkeyAuthStore};
pub use context::{AuthorizationContext, Scope};
pub use error::{AuthError, AuthErrorKind};
pub use factory::{build_authorizer, build_token_verifier};
pub use scanner_jwt::{JwtScannerVerifier, TokenVerifier};
