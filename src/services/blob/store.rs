use async_trait::async_trait;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob store backend error: {0}")]
    Backend(String),
}

impl From<RepoError> for StoreError {
    fn from(e: RepoError) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Object storage addressed by derived keys.
///
/// Absence is a value, not an error: `get` returns `None`, `delete` returns `false`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, body: &[u8]) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
