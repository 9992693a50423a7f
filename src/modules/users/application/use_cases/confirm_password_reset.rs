use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_logged;
use crate::modules::users::application::domain::validation::validate_password;
use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{
    PasswordHasher, UserQuery, UserRepository,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{link_owner, AccountFlowError};
use crate::shared::validation::FieldErrors;

// ========================= New Password Request =========================
#[derive(Debug, Clone, PartialEq)]
pub struct NewPasswordRequest {
    password: String,
}

impl NewPasswordRequest {
    pub fn new(password: Option<String>, re_password: Option<String>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let password = errors.check(
            "password",
            validate_password(password.as_deref().unwrap_or_default()),
        );

        let confirmation = re_password.unwrap_or_default();
        if confirmation.is_empty() {
            errors.add("re_password", "Password Confirmation Is Required");
        }

        match password {
            Some(password) if errors.is_empty() => {
                if password != confirmation {
                    return Err(FieldErrors::single("password", "Passwords Do Not Match"));
                }
                Ok(Self { password })
            }
            _ => Err(errors),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// ========================= Confirm Password Reset Use Case =========================
#[async_trait]
pub trait IConfirmPasswordResetUseCase: Send + Sync {
    async fn execute(
        &self,
        token: &str,
        request: Result<NewPasswordRequest, FieldErrors>,
    ) -> Result<(), AccountFlowError>;
}

pub struct ConfirmPasswordResetUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl ConfirmPasswordResetUseCase {
    pub fn new(
        query: Arc<dyn UserQuery>,
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenLifecycle,
        notifier: Arc<dyn AccountNotifier>,
    ) -> Self {
        Self {
            query,
            repository,
            hasher,
            tokens,
            notifier,
        }
    }
}

#[async_trait]
impl IConfirmPasswordResetUseCase for ConfirmPasswordResetUseCase {
    async fn execute(
        &self,
        token: &str,
        request: Result<NewPasswordRequest, FieldErrors>,
    ) -> Result<(), AccountFlowError> {
        let user = link_owner(
            &self.tokens,
            self.query.as_ref(),
            token,
            TokenPurpose::ResetPassword,
        )
        .await?;
        let request = request.map_err(AccountFlowError::Validation)?;

        let password_hash = self.hasher.hash_password(request.password()).await?;
        self.repository
            .update_password(user.id, password_hash)
            .await?;

        self.tokens
            .revoke(
                user.id,
                &[
                    TokenPurpose::ResetPassword,
                    TokenPurpose::Access,
                    TokenPurpose::Refresh,
                ],
            )
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        notify_logged(self.notifier.as_ref(), &user, AccountNotice::PasswordResetDone).await;

        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}
