use async_trait::async_trait;

use crate::modules::users::application::domain::OAuthBackend;
use crate::modules::users::application::ports::outgoing::TokenCacheError;

/// Pending OAuth `state` values. Each one is accepted by a single callback.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    async fn save_state(
        &self,
        backend: OAuthBackend,
        state: &str,
        ttl_secs: u64,
    ) -> Result<(), TokenCacheError>;

    /// Deletes the state and reports whether it was pending.
    async fn take_state(&self, backend: OAuthBackend, state: &str)
        -> Result<bool, TokenCacheError>;
}
