use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::application::domain::OAuthBackend;
use crate::modules::users::application::ports::outgoing::{UserQueryError, UserRepositoryError};

/// Links between accounts and provider identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialAccountStore: Send + Sync {
    async fn find_user_id(
        &self,
        backend: OAuthBackend,
        uid: &str,
    ) -> Result<Option<Uuid>, UserQueryError>;

    /// True when the account signed up or signed in through any provider.
    async fn is_linked(&self, user_id: Uuid) -> Result<bool, UserQueryError>;

    async fn link(
        &self,
        user_id: Uuid,
        backend: OAuthBackend,
        uid: &str,
    ) -> Result<(), UserRepositoryError>;
}
