pub mod store;
pub mod valkey;

pub use store::{AuthCacheStore, CachedAuthorization};
pub use valkey::ValkeyAuthStore;
