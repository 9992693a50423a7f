use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::modules::users::application::domain::OAuthBackend;
use crate::modules::users::application::ports::outgoing::{
    OAuthProvider, OAuthProviderError, OAuthStateStore,
};

/// How long the browser has to come back from the provider.
pub const OAUTH_STATE_TTL_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq)]
pub enum OAuthError {
    /// Not a known backend name, or one without credentials
    UnknownBackend,
    /// The provider or the browser did not complete the handshake
    AuthenticationFailed,
    /// The verified email belongs to an account that signs in with a password
    EmailInUse,
    UserInactive,
    ProviderError(String),
    StateStoreError(String),
    TokenGenerationFailed(String),
    QueryError(String),
    RepositoryError(String),
    HashingFailed(String),
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthError::UnknownBackend => write!(f, "Unsupported OAuth Backend"),
            OAuthError::AuthenticationFailed => write!(f, "Authentication Failed"),
            OAuthError::EmailInUse => write!(f, "Email Already Exists"),
            OAuthError::UserInactive => write!(f, "User Is Not Active"),
            OAuthError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            OAuthError::StateStoreError(msg) => write!(f, "State store error: {}", msg),
            OAuthError::TokenGenerationFailed(msg) => {
                write!(f, "Token generation failed: {}", msg)
            }
            OAuthError::QueryError(msg) => write!(f, "Query error: {}", msg),
            OAuthError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            OAuthError::HashingFailed(msg) => write!(f, "Hashing failed: {}", msg),
        }
    }
}

impl std::error::Error for OAuthError {}

impl From<OAuthProviderError> for OAuthError {
    fn from(error: OAuthProviderError) -> Self {
        match error {
            OAuthProviderError::NotConfigured(_) => OAuthError::UnknownBackend,
            OAuthProviderError::CodeRejected(_) | OAuthProviderError::MissingEmail => {
                OAuthError::AuthenticationFailed
            }
            OAuthProviderError::RequestFailed(msg) => OAuthError::ProviderError(msg),
        }
    }
}

/// Resolves a route segment to a backend that has credentials.
pub fn resolve_backend(
    provider: &dyn OAuthProvider,
    backend_name: &str,
) -> Result<OAuthBackend, OAuthError> {
    OAuthBackend::from_name(backend_name)
        .filter(|backend| provider.is_configured(*backend))
        .ok_or(OAuthError::UnknownBackend)
}

#[async_trait]
pub trait IOAuthLoginUseCase: Send + Sync {
    /// Returns the provider URL the client should open.
    async fn execute(&self, backend_name: &str) -> Result<String, OAuthError>;
}

pub struct OAuthLoginUseCase {
    provider: Arc<dyn OAuthProvider>,
    states: Arc<dyn OAuthStateStore>,
}

impl OAuthLoginUseCase {
    pub fn new(provider: Arc<dyn OAuthProvider>, states: Arc<dyn OAuthStateStore>) -> Self {
        Self { provider, states }
    }
}

#[async_trait]
impl IOAuthLoginUseCase for OAuthLoginUseCase {
    async fn execute(&self, backend_name: &str) -> Result<String, OAuthError> {
        let backend = resolve_backend(self.provider.as_ref(), backend_name)?;
        let request = self.provider.authorization_request(backend)?;

        self.states
            .save_state(backend, &request.state, OAUTH_STATE_TTL_SECS)
            .await
            .map_err(|e| OAuthError::StateStoreError(e.to_string()))?;

        tracing::debug!(backend = %backend, "OAuth authorization URL issued");
        Ok(request.url)
    }
}
