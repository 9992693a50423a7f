use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::application::domain::TokenPurpose;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenCacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache command failed: {0}")]
    CommandError(String),
}

/// Key-value store remembering the single outstanding token per
/// (user, purpose). A token that is not the stored value is considered revoked.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
    ) -> Result<Option<String>, TokenCacheError>;

    /// Replaces the stored token; it expires after `ttl_secs`.
    async fn store(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), TokenCacheError>;

    async fn revoke(&self, purpose: TokenPurpose, user_id: Uuid) -> Result<(), TokenCacheError>;

    /// Deletes several purposes at once.
    async fn revoke_many(
        &self,
        purposes: &[TokenPurpose],
        user_id: Uuid,
    ) -> Result<(), TokenCacheError>;
}
