use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{UserQuery, UserRepository};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};

#[async_trait]
pub trait IConfirmReactivationUseCase: Send + Sync {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError>;
}

/// Re-enables an account from a reactivation link (explicit request or
/// username change).
pub struct ConfirmReactivationUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ConfirmReactivationUseCase {
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
impl IConfirmReactivationUseCase for ConfirmReactivationUseCase {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError> {
        let user = link_owner(
            &self.tokens,
            self.query.as_ref(),
            token,
            TokenPurpose::Reactivation,
        )
        .await?;

        let user = self.repository.set_active(user.id, true).await?;
        self.tokens
            .revoke(
                user.id,
                &[
                    TokenPurpose::Reactivation,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        notify_logged(self.notifier.as_ref(), &user, AccountNotice::Reactivated).await;

        tracing::info!(user_id = %user.id, "User reactivated");
        Ok(user)
    }
}
