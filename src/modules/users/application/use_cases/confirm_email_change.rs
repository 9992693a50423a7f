use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::validation::normalize_email;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{
    UserQuery, UserRepository, UserRepositoryError,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};
use crate::shared::validation::FieldErrors;

// ========================= Change Email Request =========================
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEmailRequest {
    email: String,
}

impl ChangeEmailRequest {
    pub fn new(email: Option<String>, re_email: Option<String>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = errors.check("email", normalize_email(email.as_deref().unwrap_or_default()));

        let confirmation = re_email.unwrap_or_default();
        if confirmation.trim().is_empty() {
            errors.add("re_email", "Email Confirmation Is Required");
        }

        match email {
            Some(email) if errors.is_empty() => {
                if email != confirmation.trim().to_lowercase() {
                    return Err(FieldErrors::single("email", "Emails Do Not Match"));
                }
                Ok(Self { email })
            }
            _ => Err(errors),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

// ========================= Confirm Email Change Use Case =========================
#[async_trait]
pub trait IConfirmEmailChangeUseCase: Send + Sync {
    /// `request` is `Err` when the payload failed validation; it is only
    /// reported once the token checks out.
    async fn execute(
        &self,
        token: &str,
        request: Result<ChangeEmailRequest, FieldErrors>,
    ) -> Result<User, AccountFlowError>;
}

/// Moves the account to a new address. The account goes back to inactive
/// until the new address is confirmed through a fresh activation link.
pub struct ConfirmEmailChangeUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ConfirmEmailChangeUseCase {
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

    fn email_taken() -> AccountFlowError {
        AccountFlowError::Validation(FieldErrors::single("email", "Email Already Exists"))
    }
}

#[async_trait]
impl IConfirmEmailChangeUseCase for ConfirmEmailChangeUseCase {
    async fn execute(
        &self,
        token: &str,
        request: Result<ChangeEmailRequest, FieldErrors>,
    ) -> Result<User, AccountFlowError> {
        let user = link_owner(
            &self.tokens,
            self.query.as_ref(),
            token,
            TokenPurpose::ChangeEmail,
        )
        .await?;
        let request = request.map_err(AccountFlowError::Validation)?;

        if self.query.email_exists(request.email()).await? {
            return Err(Self::email_taken());
        }

        let old_email = user.email.clone();
        let user = match self
            .repository
            .update_email(user.id, request.email().to_string())
            .await
        {
            Ok(user) => user,
            Err(UserRepositoryError::UserAlreadyExists) => return Err(Self::email_taken()),
            Err(e) => return Err(e.into()),
        };

        self.tokens
            .revoke(
                user.id,
                &[
                    TokenPurpose::ChangeEmail,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        let user = self.repository.set_active(user.id, false).await?;

        let activation = self
            .tokens
            .issue(user.id, TokenPurpose::Activation)
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        notify_logged(
            self.notifier.as_ref(),
            &user,
            AccountNotice::EmailChanged { old_email },
        )
        .await;
        notify_logged(
            self.notifier.as_ref(),
            &user,
            AccountNotice::EmailReactivation(self.tokens.link(activation, TokenPurpose::Activation)),
        )
        .await;

        tracing::info!(user_id = %user.id, "User email changed");
        Ok(user)
    }
}
