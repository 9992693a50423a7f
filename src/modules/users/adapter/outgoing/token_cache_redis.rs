use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::users::application::domain::{OAuthBackend, TokenPurpose};
use crate::modules::users::application::ports::outgoing::{
    OAuthStateStore, TokenCache, TokenCacheError,
};

pub const DEFAULT_KEY_PREFIX: &str = "token_cache:";

/// Redis-backed `TokenCache`.
///
/// ## Redis data model
/// ```text
/// {prefix}{purpose}_token_{user_id} -> "<jwt>"
/// {prefix}oauth_state_{backend}_{state} -> "1"
/// ```
/// One key per (user, purpose), written with `SET ... EX <lifetime>` so Redis
/// drops it when the token would expire anyway. Overwriting the key revokes
/// whatever token was stored before.
#[derive(Clone)]
pub struct RedisTokenCache {
    pool: Arc<Pool>,
    prefix: String,
}

impl RedisTokenCache {
    pub fn new(pool: Arc<Pool>, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    fn key(&self, purpose: TokenPurpose, user_id: Uuid) -> String {
        format!("{}{}", self.prefix, purpose.cache_key(user_id))
    }

    fn state_key(&self, backend: OAuthBackend, state: &str) -> String {
        format!("{}oauth_state_{}_{}", self.prefix, backend, state)
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, TokenCacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| TokenCacheError::ConnectionError(format!("Pool error: {}", e)))
    }
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
    ) -> Result<Option<String>, TokenCacheError> {
        let key = self.key(purpose, user_id);
        let mut conn = self.get_conn().await?;

        conn.get(&key)
            .await
            .map_err(|e| TokenCacheError::CommandError(e.to_string()))
    }

    async fn store(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), TokenCacheError> {
        let key = self.key(purpose, user_id);
        let mut conn = self.get_conn().await?;

        conn.set_ex::<_, _, ()>(&key, token, ttl_secs.max(1))
            .await
            .map_err(|e| TokenCacheError::CommandError(e.to_string()))?;

        tracing::debug!(key = %key, ttl_secs, "Token cached");
        Ok(())
    }

    async fn revoke(&self, purpose: TokenPurpose, user_id: Uuid) -> Result<(), TokenCacheError> {
        let key = self.key(purpose, user_id);
        let mut conn = self.get_conn().await?;

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| TokenCacheError::CommandError(e.to_string()))?;

        Ok(())
    }

    /// Deletes every key in one `MULTI/EXEC` so a logout never leaves the
    /// refresh token behind while the access token is gone.
    async fn revoke_many(
        &self,
        purposes: &[TokenPurpose],
        user_id: Uuid,
    ) -> Result<(), TokenCacheError> {
        if purposes.is_empty() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let mut pipe = deadpool_redis::redis::pipe();
        pipe.atomic();
        for purpose in purposes {
            pipe.del(self.key(*purpose, user_id)).ignore();
        }

        pipe.query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TokenCacheError::CommandError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl OAuthStateStore for RedisTokenCache {
    async fn save_state(
        &self,
        backend: OAuthBackend,
        state: &str,
        ttl_secs: u64,
    ) -> Result<(), TokenCacheError> {
        let key = self.state_key(backend, state);
        let mut conn = self.get_conn().await?;

        conn.set_ex::<_, _, ()>(&key, 1, ttl_secs.max(1))
            .await
            .map_err(|e| TokenCacheError::CommandError(e.to_string()))
    }

    /// `DEL` reports how many keys it removed, so two racing callbacks cannot
    /// both consume the same state.
    async fn take_state(
        &self,
        backend: OAuthBackend,
        state: &str,
    ) -> Result<bool, TokenCacheError> {
        let key = self.state_key(backend, state);
        let mut conn = self.get_conn().await?;

        let removed: u64 = conn
            .del(&key)
            .await
            .map_err(|e| TokenCacheError::CommandError(e.to_string()))?;
        Ok(removed > 0)
    }
}
