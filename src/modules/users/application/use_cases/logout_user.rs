use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::services::{TokenLifecycle, TokenLifecycleError};

#[async_trait]
pub trait ILogoutUserUseCase: Send + Sync {
    async fn execute(&self, user_id: Uuid) -> Result<(), TokenLifecycleError>;
}

/// Ends the session by dropping the cached access and refresh tokens.
pub struct LogoutUserUseCase {
    tokens: TokenLifecycle,
}

impl LogoutUserUseCase {
    pub fn new(tokens: TokenLifecycle) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl ILogoutUserUseCase for LogoutUserUseCase {
    async fn execute(&self, user_id: Uuid) -> Result<(), TokenLifecycleError> {
        self.tokens.revoke(user_id, &TokenPurpose::SESSION).await?;
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }
}
