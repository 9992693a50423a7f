use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::application::domain::User;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Read side of the user store.
///
/// Lookups by username/email expect already-lowercased input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError>;

    /// Matches either the username or the email.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserQueryError>;

    async fn username_exists(&self, username: &str) -> Result<bool, UserQueryError>;

    async fn email_exists(&self, email: &str) -> Result<bool, UserQueryError>;
}
