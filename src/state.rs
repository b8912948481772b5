/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: scanner token の検証
 *   - authorizer: registry の信頼判定 (cache 付き)
 *   - blobs: object storage
 * - リクエストごとに Clone されるので中身はすべて Arc
 */
use std::sync::Arc;

use crate::services::{
    auth::{Authorizer, TokenVerifier},
    blob::BlobStore,
};

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub authorizer: Arc<Authorizer>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        authorizer: Arc<Authorizer>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            verifier,
            authorizer,
            blobs,
        }
    }
}
