use chrono::{Duration, Utc};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::email::application::ports::outgoing::NoticeLink;
use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{
    AccountMetrics, TokenCache, TokenError, TokenProvider,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenLifecycleError {
    /// Signature, issuer, type or shape is wrong
    Invalid,
    Expired,
    /// Decodes fine but is not the cached token for this purpose
    NotCurrent,
    Cache(String),
    Issue(String),
}

impl fmt::Display for TokenLifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenLifecycleError::Invalid => write!(f, "Invalid token"),
            TokenLifecycleError::Expired => write!(f, "Token has expired"),
            TokenLifecycleError::NotCurrent => write!(f, "Token is no longer current"),
            TokenLifecycleError::Cache(msg) => write!(f, "Token cache error: {}", msg),
            TokenLifecycleError::Issue(msg) => write!(f, "Token issue error: {}", msg),
        }
    }
}

impl std::error::Error for TokenLifecycleError {}

/// Couples the signed token with its cache slot: a token is only honoured
/// while it is the value stored for its (user, purpose).
#[derive(Clone)]
pub struct TokenLifecycle {
    provider: Arc<dyn TokenProvider>,
    cache: Arc<dyn TokenCache>,
    metrics: Arc<dyn AccountMetrics>,
}

impl TokenLifecycle {
    pub fn new(
        provider: Arc<dyn TokenProvider>,
        cache: Arc<dyn TokenCache>,
        metrics: Arc<dyn AccountMetrics>,
    ) -> Self {
        Self {
            provider,
            cache,
            metrics,
        }
    }

    /// Lifetime of a freshly issued token, in seconds.
    pub fn lifetime_secs(&self, purpose: TokenPurpose) -> i64 {
        self.provider.lifetime_secs(purpose)
    }

    /// Wraps `token` for an email, with the expiry a fresh token of `purpose` would have.
    pub fn link(&self, token: String, purpose: TokenPurpose) -> NoticeLink {
        NoticeLink {
            token,
            expires_at: Utc::now() + Duration::seconds(self.lifetime_secs(purpose)),
        }
    }

    /// Issues a token and makes it the current one.
    pub async fn issue(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
    ) -> Result<String, TokenLifecycleError> {
        let issued = self
            .provider
            .issue(user_id, purpose)
            .map_err(|e| TokenLifecycleError::Issue(e.to_string()))?;

        let ttl_secs = u64::try_from(issued.expires_in).unwrap_or(0).max(1);
        let stored = self
            .cache
            .store(purpose, user_id, &issued.token, ttl_secs)
            .await;
        self.metrics.record_cache_operation("set", stored.is_ok());
        stored.map_err(|e| {
            tracing::error!(user_id = %user_id, token_type = %purpose, "Failed to cache token: {}", e);
            TokenLifecycleError::Cache(e.to_string())
        })?;

        tracing::debug!(user_id = %user_id, token_type = %purpose, "Token issued");
        Ok(issued.token)
    }

    /// Returns the cached token while it still verifies, otherwise issues a new one.
    pub async fn current_or_issue(
        &self,
        user_id: Uuid,
        purpose: TokenPurpose,
    ) -> Result<String, TokenLifecycleError> {
        if let Some(token) = self.cached(purpose, user_id).await? {
            match self.provider.verify(&token, purpose) {
                Ok(claims) if claims.sub == user_id => {
                    tracing::debug!(user_id = %user_id, token_type = %purpose, "Reusing cached token");
                    return Ok(token);
                }
                _ => {
                    tracing::debug!(user_id = %user_id, token_type = %purpose, "Cached token unusable, issuing a new one");
                }
            }
        }

        self.issue(user_id, purpose).await
    }

    /// Verifies `token` for `purpose` and checks it is the cached one.
    /// Returns the user id from the `sub` claim.
    pub async fn validate(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> Result<Uuid, TokenLifecycleError> {
        let claims = match self.provider.verify(token, purpose) {
            Ok(claims) => claims,
            Err(e) => {
                self.metrics.record_token_validation(purpose, false);
                return Err(match e {
                    TokenError::TokenExpired => TokenLifecycleError::Expired,
                    _ => TokenLifecycleError::Invalid,
                });
            }
        };

        let cached = self.cached(purpose, claims.sub).await?;
        if cached.as_deref() != Some(token) {
            self.metrics.record_token_validation(purpose, false);
            tracing::info!(user_id = %claims.sub, token_type = %purpose, "Token is not the current one");
            return Err(TokenLifecycleError::NotCurrent);
        }

        self.metrics.record_token_validation(purpose, true);
        Ok(claims.sub)
    }

    /// Drops the cached tokens of every purpose in `purposes`.
    pub async fn revoke(
        &self,
        user_id: Uuid,
        purposes: &[TokenPurpose],
    ) -> Result<(), TokenLifecycleError> {
        let result = self.cache.revoke_many(purposes, user_id).await;
        self.metrics.record_cache_operation("delete", result.is_ok());
        result.map_err(|e| {
            tracing::error!(user_id = %user_id, "Failed to revoke tokens: {}", e);
            TokenLifecycleError::Cache(e.to_string())
        })?;

        for purpose in purposes {
            self.metrics.record_tokens_revoked(*purpose);
        }
        tracing::debug!(user_id = %user_id, count = purposes.len(), "Tokens revoked");
        Ok(())
    }

    async fn cached(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
    ) -> Result<Option<String>, TokenLifecycleError> {
        let result = self.cache.get(purpose, user_id).await;
        self.metrics.record_cache_operation("get", result.is_ok());
        result.map_err(|e| {
            tracing::error!(user_id = %user_id, token_type = %purpose, "Failed to read token cache: {}", e);
            TokenLifecycleError::Cache(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::application::ports::outgoing::account_metrics::MockAccountMetrics;
    use crate::modules::users::application::ports::outgoing::token_provider::MockTokenProvider;
    use crate::tests::support::auth_helper::{test_lifecycle, test_token_service};
    use crate::tests::support::memory_token_cache::InMemoryTokenCache;

    fn test_provider() -> Arc<dyn TokenProvider> {
        test_token_service()
    }

    fn lifecycle_with(cache: Arc<InMemoryTokenCache>) -> TokenLifecycle {
        test_lifecycle(cache)
    }

    #[tokio::test]
    async fn issue_stores_token_with_purpose_ttl() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache.clone());
        let user_id = Uuid::new_v4();

        let token = lifecycle
            .issue(user_id, TokenPurpose::Refresh)
            .await
            .unwrap();

        assert_eq!(
            cache.get(TokenPurpose::Refresh, user_id).await.unwrap(),
            Some(token)
        );
        assert_eq!(cache.ttl_of(TokenPurpose::Refresh, user_id), Some(21600));
    }

    #[tokio::test]
    async fn current_or_issue_reuses_valid_cached_token() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache.clone());
        let user_id = Uuid::new_v4();

        let first = lifecycle
            .current_or_issue(user_id, TokenPurpose::Deletion)
            .await
            .unwrap();
        let second = lifecycle
            .current_or_issue(user_id, TokenPurpose::Deletion)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn current_or_issue_replaces_garbage_in_cache() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache.clone());
        let user_id = Uuid::new_v4();
        cache
            .store(TokenPurpose::Access, user_id, "stale", 60)
            .await
            .unwrap();

        let token = lifecycle
            .current_or_issue(user_id, TokenPurpose::Access)
            .await
            .unwrap();

        assert_ne!(token, "stale");
        assert_eq!(
            cache.get(TokenPurpose::Access, user_id).await.unwrap(),
            Some(token)
        );
    }

    #[tokio::test]
    async fn validate_accepts_current_token() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache);
        let user_id = Uuid::new_v4();

        let token = lifecycle
            .issue(user_id, TokenPurpose::Activation)
            .await
            .unwrap();

        assert_eq!(
            lifecycle
                .validate(&token, TokenPurpose::Activation)
                .await
                .unwrap(),
            user_id
        );
    }

    #[tokio::test]
    async fn validate_rejects_superseded_token() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache);
        let user_id = Uuid::new_v4();

        let old = lifecycle
            .issue(user_id, TokenPurpose::ResetPassword)
            .await
            .unwrap();
        lifecycle
            .issue(user_id, TokenPurpose::ResetPassword)
            .await
            .unwrap();

        let result = lifecycle.validate(&old, TokenPurpose::ResetPassword).await;
        assert_eq!(result, Err(TokenLifecycleError::NotCurrent));
    }

    #[tokio::test]
    async fn validate_rejects_revoked_token() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache);
        let user_id = Uuid::new_v4();

        let access = lifecycle
            .issue(user_id, TokenPurpose::Access)
            .await
            .unwrap();
        lifecycle
            .revoke(user_id, &TokenPurpose::SESSION)
            .await
            .unwrap();

        let result = lifecycle.validate(&access, TokenPurpose::Access).await;
        assert_eq!(result, Err(TokenLifecycleError::NotCurrent));
    }

    #[tokio::test]
    async fn validate_rejects_token_of_other_purpose() {
        let cache = Arc::new(InMemoryTokenCache::new());
        let lifecycle = lifecycle_with(cache);
        let user_id = Uuid::new_v4();

        let token = lifecycle
            .issue(user_id, TokenPurpose::Reactivation)
            .await
            .unwrap();

        let result = lifecycle.validate(&token, TokenPurpose::Activation).await;
        assert_eq!(result, Err(TokenLifecycleError::Invalid));
    }

    #[tokio::test]
    async fn validate_maps_expiry() {
        let mut provider = MockTokenProvider::new();
        provider
            .expect_verify()
            .returning(|_, _| Err(TokenError::TokenExpired));

        let mut metrics = MockAccountMetrics::new();
        metrics
            .expect_record_token_validation()
            .withf(|purpose, success| *purpose == TokenPurpose::Deactivation && !success)
            .times(1)
            .return_const(());

        let lifecycle = TokenLifecycle::new(
            Arc::new(provider),
            Arc::new(InMemoryTokenCache::new()),
            Arc::new(metrics),
        );

        let result = lifecycle
            .validate("expired", TokenPurpose::Deactivation)
            .await;
        assert_eq!(result, Err(TokenLifecycleError::Expired));
    }

    #[tokio::test]
    async fn cache_outage_surfaces_as_cache_error() {
        let cache = Arc::new(InMemoryTokenCache::new());
        cache.set_unavailable(true);
        let lifecycle = lifecycle_with(cache);

        let result = lifecycle
            .issue(Uuid::new_v4(), TokenPurpose::Access)
            .await;
        assert!(matches!(result, Err(TokenLifecycleError::Cache(_))));
    }

    #[tokio::test]
    async fn revoke_records_each_purpose() {
        let mut metrics = MockAccountMetrics::new();
        metrics
            .expect_record_cache_operation()
            .withf(|op, success| op == "delete" && *success)
            .times(1)
            .return_const(());
        metrics
            .expect_record_tokens_revoked()
            .times(3)
            .return_const(());

        let lifecycle = TokenLifecycle::new(
            test_provider(),
            Arc::new(InMemoryTokenCache::new()),
            Arc::new(metrics),
        );

        lifecycle
            .revoke(
                Uuid::new_v4(),
                &[
                    TokenPurpose::Deletion,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .unwrap();
    }
}
