use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::UserQuery;
use crate::modules::users::application::services::{TokenLifecycle, TokenLifecycleError};

/// Why a session token (access or refresh) was not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    InvalidToken,
    TokenExpired,
    TokenRevoked,
    UserNotFound,
    UserDisabled,
    Internal(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidToken => write!(f, "Invalid Token"),
            SessionError::TokenExpired => write!(f, "Token Has Expired"),
            SessionError::TokenRevoked => write!(f, "Token Has Been Revoked"),
            SessionError::UserNotFound => write!(f, "User Not Found"),
            SessionError::UserDisabled => write!(f, "User Account Is Disabled"),
            SessionError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<TokenLifecycleError> for SessionError {
    fn from(e: TokenLifecycleError) -> Self {
        match e {
            TokenLifecycleError::Invalid => SessionError::InvalidToken,
            TokenLifecycleError::Expired => SessionError::TokenExpired,
            TokenLifecycleError::NotCurrent => SessionError::TokenRevoked,
            other => SessionError::Internal(other.to_string()),
        }
    }
}

/// Checks a session token against the cache and loads its active owner.
pub(crate) async fn session_owner(
    tokens: &TokenLifecycle,
    query: &dyn UserQuery,
    token: &str,
    purpose: TokenPurpose,
) -> Result<User, SessionError> {
    if token.trim().is_empty() {
        return Err(SessionError::InvalidToken);
    }

    let user_id = tokens.validate(token, purpose).await?;

    let user = query
        .find_by_id(user_id)
        .await
        .map_err(|e| SessionError::Internal(e.to_string()))?
        .ok_or(SessionError::UserNotFound)?;

    if !user.is_active {
        return Err(SessionError::UserDisabled);
    }
    Ok(user)
}

/// Resolves the bearer access token of a request to its user.
#[async_trait]
pub trait IAuthenticateUserUseCase: Send + Sync {
    async fn execute(&self, access_token: &str) -> Result<User, SessionError>;
}

pub struct AuthenticateUserUseCase {
    query: Arc<dyn UserQuery>,
    tokens: TokenLifecycle,
}

impl AuthenticateUserUseCase {
    pub fn new(query: Arc<dyn UserQuery>, tokens: TokenLifecycle) -> Self {
        Self { query, tokens }
    }
}

#[async_trait]
impl IAuthenticateUserUseCase for AuthenticateUserUseCase {
    async fn execute(&self, access_token: &str) -> Result<User, SessionError> {
        session_owner(
            &self.tokens,
            self.query.as_ref(),
            access_token,
            TokenPurpose::Access,
        )
        .await
    }
}
