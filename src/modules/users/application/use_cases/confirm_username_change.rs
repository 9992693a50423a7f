use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::validation::normalize_username;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{
    UserQuery, UserRepository, UserRepositoryError,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};
use crate::shared::validation::FieldErrors;

// ========================= Change Username Request =========================
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeUsernameRequest {
    username: String,
}

impl ChangeUsernameRequest {
    pub fn new(username: Option<String>, re_username: Option<String>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let username = errors.check(
            "username",
            normalize_username(username.as_deref().unwrap_or_default()),
        );

        let confirmation = re_username.unwrap_or_default();
        if confirmation.trim().is_empty() {
            errors.add("re_username", "Username Confirmation Is Required");
        }

        match username {
            Some(username) if errors.is_empty() => {
                if username != confirmation.trim().to_lowercase() {
                    return Err(FieldErrors::single("username", "Usernames Do Not Match"));
                }
                Ok(Self { username })
            }
            _ => Err(errors),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

// ========================= Confirm Username Change Use Case =========================
#[async_trait]
pub trait IConfirmUsernameChangeUseCase: Send + Sync {
    async fn execute(
        &self,
        token: &str,
        request: Result<ChangeUsernameRequest, FieldErrors>,
    ) -> Result<User, AccountFlowError>;
}

/// Renames the account, then parks it inactive behind a reactivation link.
pub struct ConfirmUsernameChangeUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ConfirmUsernameChangeUseCase {
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

    fn username_taken() -> AccountFlowError {
        AccountFlowError::Validation(FieldErrors::single("username", "Username Already Exists"))
    }
}

#[async_trait]
impl IConfirmUsernameChangeUseCase for ConfirmUsernameChangeUseCase {
    async fn execute(
        &self,
        token: &str,
        request: Result<ChangeUsernameRequest, FieldErrors>,
    ) -> Result<User, AccountFlowError> {
        let user = link_owner(
            &self.tokens,
            self.query.as_ref(),
            token,
            TokenPurpose::ChangeUsername,
        )
        .await?;
        let request = request.map_err(AccountFlowError::Validation)?;

        if self.query.username_exists(request.username()).await? {
            return Err(Self::username_taken());
        }

        let user = match self
            .repository
            .update_username(user.id, request.username().to_string())
            .await
        {
            Ok(user) => user,
            Err(UserRepositoryError::UserAlreadyExists) => return Err(Self::username_taken()),
            Err(e) => return Err(e.into()),
        };

        self.tokens
            .revoke(
                user.id,
                &[
                    TokenPurpose::ChangeUsername,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        let user = self.repository.set_active(user.id, false).await?;

        let reactivation = self
            .tokens
            .issue(user.id, TokenPurpose::Reactivation)
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        notify_logged(self.notifier.as_ref(), &user, AccountNotice::UsernameChanged).await;
        notify_logged(
            self.notifier.as_ref(),
            &user,
            AccountNotice::UsernameReactivation(
                self.tokens.link(reactivation, TokenPurpose::Reactivation),
            ),
        )
        .await;

        tracing::info!(user_id = %user.id, "Username changed");
        Ok(user)
    }
}
