use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::UserQuery;
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::{
    AccountFlowError, IdentifierRequest,
};
use crate::shared::validation::FieldErrors;

#[async_trait]
pub trait IRequestReactivationUseCase: Send + Sync {
    async fn execute(&self, request: IdentifierRequest) -> Result<(), AccountFlowError>;
}

/// Emails a reactivation link to a deactivated account. Unauthenticated.
pub struct RequestReactivationUseCase {
    query: Arc<dyn UserQuery>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl RequestReactivationUseCase {
    pub fn new(
        query: Arc<dyn UserQuery>,
        tokens: TokenLifecycle,
        notifier: Arc<dyn AccountNotifier>,
    ) -> Self {
        Self {
            query,
            tokens,
            notifier,
        }
    }
}

#[async_trait]
impl IRequestReactivationUseCase for RequestReactivationUseCase {
    async fn execute(&self, request: IdentifierRequest) -> Result<(), AccountFlowError> {
        let user = self
            .query
            .find_by_identifier(request.identifier())
            .await?
            .ok_or_else(|| {
                AccountFlowError::Validation(FieldErrors::single(
                    "identifier",
                    "No Account Found With This Identifier",
                ))
            })?;

        if user.is_active {
            return Err(AccountFlowError::Validation(FieldErrors::single(
                "identifier",
                "Account Is Already Active",
            )));
        }

        let token = self
            .tokens
            .current_or_issue(user.id, TokenPurpose::Reactivation)
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        self.notifier
            .notify(
                &user,
                AccountNotice::ReactivationRequest(
                    self.tokens.link(token, TokenPurpose::Reactivation),
                ),
            )
            .await
            .map_err(|e| AccountFlowError::NotificationFailed(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Reactivation link sent");
        Ok(())
    }
}
