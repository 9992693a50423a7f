use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{UserQuery, UserRepository};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::authenticate_user::{
    session_owner, SessionError,
};
use crate::modules::users::application::use_cases::login_user::SessionTokens;

/// Trades the current refresh token for a fresh access token. The refresh
/// token itself is kept.
#[async_trait]
pub trait IReLoginUseCase: Send + Sync {
    async fn execute(&self, refresh_token: &str) -> Result<SessionTokens, SessionError>;
}

pub struct ReLoginUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
}

impl ReLoginUseCase {
    pub fn new(
        query: Arc<dyn UserQuery>,
        repository: Arc<dyn UserRepository>,
        tokens: TokenLifecycle,
    ) -> Self {
        Self {
            query,
            repository,
            tokens,
        }
    }
}

#[async_trait]
impl IReLoginUseCase for ReLoginUseCase {
    async fn execute(&self, refresh_token: &str) -> Result<SessionTokens, SessionError> {
        let user = session_owner(
            &self.tokens,
            self.query.as_ref(),
            refresh_token,
            TokenPurpose::Refresh,
        )
        .await
        .inspect_err(|e| tracing::info!("Re-login rejected: {}", e))?;

        let access_token = self.tokens.issue(user.id, TokenPurpose::Access).await?;

        let user = self
            .repository
            .record_login(user.id, Utc::now())
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User re-logged in");
        Ok(SessionTokens {
            user,
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }
}
