use std::fmt;

use crate::modules::users::application::domain::validation::normalize_identifier;
use crate::modules::users::application::domain::{TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{
    HashError, UserQuery, UserQueryError, UserRepositoryError,
};
use crate::modules::users::application::services::{TokenLifecycle, TokenLifecycleError};
use crate::shared::validation::FieldErrors;

/// Failure of an emailed-link flow (register, activate, request/confirm pairs).
#[derive(Debug, Clone, PartialEq)]
pub enum AccountFlowError {
    /// The link token does not decode for its purpose (bad signature, expired, wrong type)
    InvalidToken(TokenPurpose),
    /// The link token decodes but is not the outstanding one
    TokenNotCurrent(TokenPurpose),
    UserNotFound,
    Validation(FieldErrors),
    NotificationFailed(String),
    QueryError(String),
    RepositoryError(String),
    HashingFailed(String),
    TokenError(String),
}

impl fmt::Display for AccountFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountFlowError::InvalidToken(purpose) => {
                write!(f, "Invalid {} Token", purpose.label())
            }
            AccountFlowError::TokenNotCurrent(purpose) => {
                write!(f, "Invalid Or Expired {} Token", purpose.label())
            }
            AccountFlowError::UserNotFound => write!(f, "User Not Found"),
            AccountFlowError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            AccountFlowError::NotificationFailed(msg) => {
                write!(f, "Notification failed: {}", msg)
            }
            AccountFlowError::QueryError(msg) => write!(f, "Query error: {}", msg),
            AccountFlowError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            AccountFlowError::HashingFailed(msg) => write!(f, "Hashing failed: {}", msg),
            AccountFlowError::TokenError(msg) => write!(f, "Token error: {}", msg),
        }
    }
}

impl std::error::Error for AccountFlowError {}

impl AccountFlowError {
    /// Maps a link-token failure for `purpose`.
    pub fn from_token(purpose: TokenPurpose, error: TokenLifecycleError) -> Self {
        match error {
            TokenLifecycleError::Invalid | TokenLifecycleError::Expired => {
                AccountFlowError::InvalidToken(purpose)
            }
            TokenLifecycleError::NotCurrent => AccountFlowError::TokenNotCurrent(purpose),
            TokenLifecycleError::Cache(msg) | TokenLifecycleError::Issue(msg) => {
                AccountFlowError::TokenError(msg)
            }
        }
    }
}

impl From<UserQueryError> for AccountFlowError {
    fn from(e: UserQueryError) -> Self {
        AccountFlowError::QueryError(e.to_string())
    }
}

impl From<UserRepositoryError> for AccountFlowError {
    fn from(e: UserRepositoryError) -> Self {
        match e {
            UserRepositoryError::UserNotFound => AccountFlowError::UserNotFound,
            other => AccountFlowError::RepositoryError(other.to_string()),
        }
    }
}

impl From<HashError> for AccountFlowError {
    fn from(e: HashError) -> Self {
        AccountFlowError::HashingFailed(e.to_string())
    }
}

/// Validates a link token and loads the account it was issued to.
pub(crate) async fn link_owner(
    tokens: &TokenLifecycle,
    query: &dyn UserQuery,
    token: &str,
    purpose: TokenPurpose,
) -> Result<User, AccountFlowError> {
    let user_id = tokens
        .validate(token, purpose)
        .await
        .map_err(|e| AccountFlowError::from_token(purpose, e))?;

    query
        .find_by_id(user_id)
        .await?
        .ok_or(AccountFlowError::UserNotFound)
}

/// `{identifier, re_identifier}` payload of the reactivation and password
/// reset requests.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierRequest {
    identifier: String,
}

impl IdentifierRequest {
    pub fn new(
        identifier: Option<String>,
        re_identifier: Option<String>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let identifier = errors.check(
            "identifier",
            normalize_identifier(identifier.as_deref().unwrap_or_default()),
        );
        let confirmation = re_identifier.unwrap_or_default();
        if confirmation.trim().is_empty() {
            errors.add("re_identifier", "Identifier Confirmation Is Required");
        }

        match identifier {
            Some(identifier) if errors.is_empty() => {
                if identifier != confirmation.trim().to_lowercase() {
                    return Err(FieldErrors::single("identifier", "Identifiers Do Not Match"));
                }
                Ok(Self { identifier })
            }
            _ => Err(errors),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}
