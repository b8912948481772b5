use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::object_repo;
use crate::services::blob::store::{BlobStore, StoreError};

#[derive(Clone, Debug)]
pub struct PgBlobStore {
    db: PgPool,
}

impl PgBlobStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let row = object_repo::get(&self.db, key).await?;

        Ok(row.map(|row| {
            tracing::debug!(
                key = %row.object_key,
                size = row.body.len(),
                updated_at = %row.updated_at,
                "object loaded"
            );
            row.body
        }))
    }

    async fn put(&self, key: &str, body: &[u8]) -> Result<(), StoreError> {
        Ok(object_repo::put(&self.db, key, body).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(object_repo::delete(&self.db, key).await?)
    }
}
