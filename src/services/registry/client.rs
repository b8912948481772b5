//! Scanner registry interface: the source of truth for scanner/bot trust.
use async_trait::async_trait;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry backend error: {0}")]
    Backend(String),
}

impl From<RepoError> for RegistryError {
    fn from(e: RepoError) -> Self {
        Self::Backend(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub owner: String,
}

/// Registry lookups. Slow and external; callers go through the authorization cache.
///
/// No retries here. Retry policy, if any, belongs to the implementation.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn is_enabled_scanner(&self, scanner: &str) -> Result<bool, RegistryError>;

    async fn is_assigned(&self, scanner: &str, bot_id: &str) -> Result<bool, RegistryError>;

    // `Ok(None)` when the bot has no registered agent.
    async fn get_agent(&self, bot_id: &str) -> Result<Option<Agent>, RegistryError>;
}
