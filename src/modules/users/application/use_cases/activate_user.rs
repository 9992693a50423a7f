use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{UserQuery, UserRepository};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};

#[async_trait]
pub trait IActivateUserUseCase: Send + Sync {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError>;
}

/// Consumes the activation link sent after sign-up or an email change.
pub struct ActivateUserUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ActivateUserUseCase {
    pub fn new(
        query: Arc<dyn UserQuery>,
        repository: Arc<dyn UserRepository>,
        tokens: TokenLifecycle,
        notifier: Arc<dyn AccountNotifier>,
    ) -> Self {
        Self {
            query,
            repository,
            tokens,
            notifier,
        }
    }
}

#[async_trait]
impl IActivateUserUseCase for ActivateUserUseCase {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError> {
        let user = link_owner(&self.tokens, self.query.as_ref(), token, TokenPurpose::Activation)
            .await?;

        let user = self.repository.set_active(user.id, true).await?;
        self.tokens
            .revoke(user.id, &[TokenPurpose::Activation])
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        notify_logged(self.notifier.as_ref(), &user, AccountNotice::Welcome).await;

        tracing::info!(user_id = %user.id, "User activated");
        Ok(user)
    }
}
