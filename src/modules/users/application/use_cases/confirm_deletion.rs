use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{UserQuery, UserRepository};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};

#[async_trait]
pub trait IConfirmDeletionUseCase: Send + Sync {
    async fn execute(&self, token: &str) -> Result<(), AccountFlowError>;
}

/// Hard-deletes the account the deletion link was issued to.
pub struct ConfirmDeletionUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ConfirmDeletionUseCase {
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
impl IConfirmDeletionUseCase for ConfirmDeletionUseCase {
    async fn execute(&self, token: &str) -> Result<(), AccountFlowError> {
        let user = link_owner(&self.tokens, self.query.as_ref(), token, TokenPurpose::Deletion)
            .await?;

        self.repository.delete(user.id).await?;
        self.tokens
            .revoke(
                user.id,
                &[
                    TokenPurpose::Deletion,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        // The row is gone; the loaded copy still has the address
        notify_logged(self.notifier.as_ref(), &user, AccountNotice::Deleted).await;

        tracing::info!(user_id = %user.id, "User deleted");
        Ok(())
    }
}
