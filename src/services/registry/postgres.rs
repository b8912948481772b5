use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::registry_repo;
use crate::services::registry::client::{Agent, Registry, RegistryError};

/// Registry backed by the registry tables in Postgres.
#[derive(Clone, Debug)]
pub struct PgRegistry {
    db: PgPool,
}

impl PgRegistry {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Registry for PgRegistry {
    async fn is_enabled_scanner(&self, scanner: &str) -> Result<bool, RegistryError> {
        // An unregistered scanner is simply not enabled.
        let enabled = registry_repo::scanner_enabled(&self.db, scanner).await?;
        Ok(enabled.unwrap_or(false))
    }

    async fn is_assigned(&self, scanner: &str, bot_id: &str) -> Result<bool, RegistryError> {
        Ok(registry_repo::assignment_exists(&self.db, scanner, bot_id).await?)
    }

    async fn get_agent(&self, bot_id: &str) -> Result<Option<Agent>, RegistryError> {
        let owner = registry_repo::agent_owner(&self.db, bot_id).await?;
        Ok(owner.map(|owner| Agent { owner }))
    }
}
