use async_trait::async_trait;

use crate::modules::users::application::domain::{OAuthBackend, OAuthProfile};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OAuthProviderError {
    #[error("OAuth backend {0} is not configured")]
    NotConfigured(OAuthBackend),

    /// The provider refused the authorization code
    #[error("Authorization code rejected: {0}")]
    CodeRejected(String),

    #[error("Provider returned no verified email")]
    MissingEmail,

    #[error("Provider request failed: {0}")]
    RequestFailed(String),
}

/// Where to send the browser, and the CSRF state the callback must echo.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn is_configured(&self, backend: OAuthBackend) -> bool;

    fn authorization_request(
        &self,
        backend: OAuthBackend,
    ) -> Result<AuthorizationRequest, OAuthProviderError>;

    /// Exchanges the callback code and loads the signed-in profile.
    async fn fetch_profile(
        &self,
        backend: OAuthBackend,
        code: &str,
    ) -> Result<OAuthProfile, OAuthProviderError>;
}
