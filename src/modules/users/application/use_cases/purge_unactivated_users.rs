use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::modules::users::application::ports::outgoing::{
    AccountMetrics, UserRepository, UserRepositoryError,
};

pub const DEFAULT_UNACTIVATED_TTL_MINUTES: i64 = 30;

#[async_trait]
pub trait IPurgeUnactivatedUsersUseCase: Send + Sync {
    /// Returns how many accounts were deleted.
    async fn execute(&self) -> Result<u64, UserRepositoryError>;
}

/// Deletes sign-ups that were never activated within the allowed window.
pub struct PurgeUnactivatedUsersUseCase {
    repository: Arc<dyn UserRepository>,
    metrics: Arc<dyn AccountMetrics>,
    ttl: Duration,
}

impl PurgeUnactivatedUsersUseCase {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        metrics: Arc<dyn AccountMetrics>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            metrics,
            ttl,
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl.num_minutes()
    }
}

#[async_trait]
impl IPurgeUnactivatedUsersUseCase for PurgeUnactivatedUsersUseCase {
    async fn execute(&self) -> Result<u64, UserRepositoryError> {
        let cutoff = Utc::now() - self.ttl;
        let deleted = self.repository.delete_unactivated_before(cutoff).await?;

        self.metrics.record_users_purged(deleted);
        tracing::info!(
            "Deleted {} Unactivated Users Older Than {} Minutes",
            deleted,
            self.ttl_minutes()
        );
        Ok(deleted)
    }
}
