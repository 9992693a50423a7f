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
pub trait IRequestPasswordResetUseCase: Send + Sync {
    async fn execute(&self, request: IdentifierRequest) -> Result<(), AccountFlowError>;
}

pub struct RequestPasswordResetUseCase {
    query: Arc<dyn UserQuery>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl RequestPasswordResetUseCase {
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
impl IRequestPasswordResetUseCase for RequestPasswordResetUseCase {
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

        let token = self
            .tokens
            .current_or_issue(user.id, TokenPurpose::ResetPassword)
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;

        self.notifier
            .notify(
                &user,
                AccountNotice::PasswordResetRequest(
                    self.tokens.link(token, TokenPurpose::ResetPassword),
                ),
            )
            .await
            .map_err(|e| AccountFlowError::NotificationFailed(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Password reset link sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::email::application::ports::outgoing::account_notifier::MockAccountNotifier;
    use crate::modules::users::application::domain::entities::fixtures::inactive_user;
    use crate::modules::users::application::ports::outgoing::user_query::MockUserQuery;
    use crate::modules::users::application::ports::outgoing::TokenCache;
    use crate::tests::support::auth_helper::test_lifecycle;
    use crate::tests::support::memory_token_cache::InMemoryTokenCache;

    fn request() -> IdentifierRequest {
        IdentifierRequest::new(Some("johndoe".into()), Some("johndoe".into())).unwrap()
    }

    #[tokio::test]
    async fn test_reset_link_is_sent_even_to_inactive_accounts() {
        let user = inactive_user();
        let found = user.clone();
        let mut query = MockUserQuery::new();
        query
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "johndoe")
            .returning(move |_| Ok(Some(found.clone())));

        let cache = Arc::new(InMemoryTokenCache::new());
        let expected = cache.clone();
        let user_id = user.id;
        let mut notifier = MockAccountNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(move |_, notice| match notice {
                AccountNotice::PasswordResetRequest(link) => {
                    assert!(!link.token.is_empty());
                    Ok(())
                }
                other => panic!("unexpected notice {other:?}"),
            });

        let use_case =
            RequestPasswordResetUseCase::new(Arc::new(query), test_lifecycle(cache), Arc::new(notifier));

        use_case.execute(request()).await.unwrap();
        assert!(expected
            .get(TokenPurpose::ResetPassword, user_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_reset_unknown_identifier() {
        let mut query = MockUserQuery::new();
        query.expect_find_by_identifier().returning(|_| Ok(None));

        let use_case = RequestPasswordResetUseCase::new(
            Arc::new(query),
            test_lifecycle(Arc::new(InMemoryTokenCache::new())),
            Arc::new(MockAccountNotifier::new()),
        );

        assert!(matches!(
            use_case.execute(request()).await,
            Err(AccountFlowError::Validation(errors)) if errors.contains("identifier")
        ));
    }
}
