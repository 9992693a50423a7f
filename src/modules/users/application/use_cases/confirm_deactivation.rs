use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{UserQuery, UserRepository};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};

#[async_trait]
pub trait IConfirmDeactivationUseCase: Send + Sync {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError>;
}

pub struct ConfirmDeactivationUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ConfirmDeactivationUseCase {
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
impl IConfirmDeactivationUseCase for ConfirmDeactivationUseCase {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError> {
        let user = link_owner(
            &self.tokens,
            self.query.as_ref(),
            token,
            TokenPurpose::Deactivation,
        )
        .await?;

        let user = self.repository.set_active(user.id, false).await?;
        self.tokens
            .revoke(
                user.id,
                &[
                    TokenPurpose::Deactivation,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        notify_logged(self.notifier.as_ref(), &user, AccountNotice::Deactivated).await;

        tracing::info!(user_id = %user.id, "User deactivated");
        Ok(user)
    }
}
