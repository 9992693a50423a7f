use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{
    AccountNotice, AccountNotifier, NoticeLink,
};
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::AccountFlowError;

/// Changes an authenticated user must confirm through an emailed link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Deactivation,
    Deletion,
    ChangeEmail,
    ChangeUsername,
}

impl AccountAction {
    pub fn purpose(&self) -> TokenPurpose {
        match self {
            AccountAction::Deactivation => TokenPurpose::Deactivation,
            AccountAction::Deletion => TokenPurpose::Deletion,
            AccountAction::ChangeEmail => TokenPurpose::ChangeEmail,
            AccountAction::ChangeUsername => TokenPurpose::ChangeUsername,
        }
    }

    fn notice(&self, link: NoticeLink) -> AccountNotice {
        match self {
            AccountAction::Deactivation => AccountNotice::DeactivationRequest(link),
            AccountAction::Deletion => AccountNotice::DeletionRequest(link),
            AccountAction::ChangeEmail => AccountNotice::EmailChangeRequest(link),
            AccountAction::ChangeUsername => AccountNotice::UsernameChangeRequest(link),
        }
    }
}

#[async_trait]
pub trait IRequestAccountActionUseCase: Send + Sync {
    async fn execute(&self, user: &User, action: AccountAction) -> Result<(), AccountFlowError>;
}

/// Emails the confirmation link for `action`, reusing an outstanding token.
pub struct RequestAccountActionUseCase {
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl RequestAccountActionUseCase {
    pub fn new(tokens: TokenLifecycle, notifier: Arc<dyn AccountNotifier>) -> Self {
        Self { tokens, notifier }
    }
}

#[async_trait]
impl IRequestAccountActionUseCase for RequestAccountActionUseCase {
    async fn execute(&self, user: &User, action: AccountAction) -> Result<(), AccountFlowError> {
        let purpose = action.purpose();
        let token = self
            .tokens
            .current_or_issue(user.id, purpose)
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        self.notifier
            .notify(user, action.notice(self.tokens.link(token, purpose)))
            .await
            .map_err(|e| AccountFlowError::NotificationFailed(e.to_string()))?;

        tracing::info!(user_id = %user.id, token_type = %purpose, "Confirmation link sent");
        Ok(())
    }
}
