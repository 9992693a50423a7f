use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::modules::users::application::domain::validation::normalize_identifier;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{
    PasswordHasher, SocialAccountStore, UserQuery, UserRepository,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::shared::validation::FieldErrors;

// ========================= Login Request =========================
/// Validated login request. The identifier is a username or an email.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    identifier: String, // Lowercased
    password: String,
}

impl LoginRequest {
    pub fn new(identifier: Option<String>, password: Option<String>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let identifier = errors.check(
            "identifier",
            normalize_identifier(identifier.as_deref().unwrap_or_default()),
        );

        let password = password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", "Password Is Required");
        }

        match identifier {
            Some(identifier) if errors.is_empty() => Ok(Self {
                identifier,
                password,
            }),
            _ => Err(errors),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// ====================== Login Error =============================
#[derive(Debug, Clone, PartialEq)]
pub enum LoginError {
    InvalidCredentials,
    UserInactive,
    /// The account was created through an OAuth provider
    SocialAccount,
    PasswordVerificationFailed(String),
    TokenGenerationFailed(String),
    QueryError(String),
    RepositoryError(String),
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::InvalidCredentials => write!(f, "Invalid Username Or Password"),
            LoginError::UserInactive => write!(f, "User Is Not Active"),
            LoginError::SocialAccount => write!(f, "User Registered With Social Auth"),
            LoginError::PasswordVerificationFailed(msg) => {
                write!(f, "Password verification failed: {}", msg)
            }
            LoginError::TokenGenerationFailed(msg) => {
                write!(f, "Token generation failed: {}", msg)
            }
            LoginError::QueryError(msg) => write!(f, "Query error: {}", msg),
            LoginError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for LoginError {}

// ============================ Login Response =================================
/// Session established by login or re-login.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTokens {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

// ============================ Login User Use Case =============================
#[async_trait]
pub trait ILoginUserUseCase: Send + Sync {
    async fn execute(&self, request: LoginRequest) -> Result<SessionTokens, LoginError>;
}

pub struct LoginUserUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    social: Arc<dyn SocialAccountStore>,
    tokens: TokenLifecycle,
}

impl LoginUserUseCase {
    pub fn new(
        query: Arc<dyn UserQuery>,
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        social: Arc<dyn SocialAccountStore>,
        tokens: TokenLifecycle,
    ) -> Self {
        Self {
            query,
            repository,
            hasher,
            social,
            tokens,
        }
    }
}

#[async_trait]
impl ILoginUserUseCase for LoginUserUseCase {
    async fn execute(&self, request: LoginRequest) -> Result<SessionTokens, LoginError> {
        // 1. Find the account by username or email
        let user = self
            .query
            .find_by_identifier(request.identifier())
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?
            .ok_or(LoginError::InvalidCredentials)?;

        // 2. Social accounts have no usable password
        let is_social = self
            .social
            .is_linked(user.id)
            .await
            .map_err(|e| LoginError::QueryError(e.to_string()))?;
        if is_social {
            tracing::info!(user_id = %user.id, "Password login refused for social account");
            return Err(LoginError::SocialAccount);
        }

        // 3. Verify password
        let is_valid = self
            .hasher
            .verify_password(request.password(), &user.password_hash)
            .await
            .map_err(|e| LoginError::PasswordVerificationFailed(e.to_string()))?;

        if !is_valid {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(LoginError::UserInactive);
        }

        // 4. Reuse the outstanding session tokens when they still verify
        let access_token = self
            .tokens
            .current_or_issue(user.id, TokenPurpose::Access)
            .await
            .map_err(|e| LoginError::TokenGenerationFailed(e.to_string()))?;
        let refresh_token = self
            .tokens
            .current_or_issue(user.id, TokenPurpose::Refresh)
            .await
            .map_err(|e| LoginError::TokenGenerationFailed(e.to_string()))?;

        let user = self
            .repository
            .record_login(user.id, Utc::now())
            .await
            .map_err(|e| LoginError::RepositoryError(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(SessionTokens {
            user,
            access_token,
            refresh_token,
        })
    }
}
