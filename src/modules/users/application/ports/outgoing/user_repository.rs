use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::users::application::domain::{NewUser, User};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts an inactive account.
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    async fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<User, UserRepositoryError>;

    async fn record_login(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError>;

    async fn update_email(&self, user_id: Uuid, email: String) -> Result<User, UserRepositoryError>;

    async fn update_username(
        &self,
        user_id: Uuid,
        username: String,
    ) -> Result<User, UserRepositoryError>;

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: String,
    ) -> Result<(), UserRepositoryError>;

    async fn delete(&self, user_id: Uuid) -> Result<(), UserRepositoryError>;

    /// Removes accounts that were never activated nor logged in and joined
    /// before `cutoff`. Returns the number of deleted rows.
    async fn delete_unactivated_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, UserRepositoryError>;
}
