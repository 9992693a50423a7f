use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::users::application::domain::validation::{
    normalize_person_name, NAME_MAX, USERNAME_MAX,
};
use crate::modules::users::application::domain::{
    NewUser, OAuthBackend, OAuthProfile, TokenPurpose, User,
};
use crate::modules::users::application::ports::outgoing::{
    OAuthProvider, OAuthStateStore, PasswordHasher, SocialAccountStore, UserQuery,
    UserRepository, UserRepositoryError,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::login_user::SessionTokens;
use crate::modules::users::application::use_cases::oauth_login::{resolve_backend, OAuthError};

/// Attempts at a free username before giving up.
const USERNAME_ATTEMPTS: usize = 5;
const USERNAME_SUFFIX_LEN: usize = 8;

/// Query string the provider redirects back with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user denied access
    pub error: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lowercase alphanumerics of the provider login, or of the email local part.
fn username_base(profile: &OAuthProfile) -> String {
    let source = profile
        .username_hint
        .as_deref()
        .unwrap_or_else(|| profile.email.split('@').next().unwrap_or_default());

    let base: String = source
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(USERNAME_MAX - USERNAME_SUFFIX_LEN)
        .collect();

    if base.is_empty() {
        "user".to_string()
    } else {
        base
    }
}

/// Keeps ASCII letters only; names that end up empty stay empty.
fn clean_name(label: &str, raw: &str) -> String {
    let letters: String = raw
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(NAME_MAX)
        .collect();
    normalize_person_name(label, &letters).unwrap_or_default()
}

#[async_trait]
pub trait IOAuthCallbackUseCase: Send + Sync {
    async fn execute(
        &self,
        backend_name: &str,
        params: OAuthCallbackParams,
    ) -> Result<SessionTokens, OAuthError>;
}

pub struct OAuthCallbackUseCase {
    provider: Arc<dyn OAuthProvider>,
    states: Arc<dyn OAuthStateStore>,
    social: Arc<dyn SocialAccountStore>,
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenLifecycle,
}

impl OAuthCallbackUseCase {
    pub fn new(
        provider: Arc<dyn OAuthProvider>,
        states: Arc<dyn OAuthStateStore>,
        social: Arc<dyn SocialAccountStore>,
        query: Arc<dyn UserQuery>,
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenLifecycle,
    ) -> Self {
        Self {
            provider,
            states,
            social,
            query,
            repository,
            hasher,
            tokens,
        }
    }

    /// Finds the account behind the provider identity, or signs a new one up.
    async fn resolve_user(
        &self,
        backend: OAuthBackend,
        profile: &OAuthProfile,
    ) -> Result<User, OAuthError> {
        let linked = self
            .social
            .find_user_id(backend, &profile.uid)
            .await
            .map_err(|e| OAuthError::QueryError(e.to_string()))?;

        if let Some(user_id) = linked {
            if let Some(user) = self
                .query
                .find_by_id(user_id)
                .await
                .map_err(|e| OAuthError::QueryError(e.to_string()))?
            {
                return Ok(user);
            }
        }

        let existing = self
            .query
            .find_by_identifier(&profile.email)
            .await
            .map_err(|e| OAuthError::QueryError(e.to_string()))?;

        match existing {
            // Same person through another provider
            Some(user) if self.is_social(user.id).await? => {
                self.link(user.id, backend, &profile.uid).await?;
                Ok(user)
            }
            Some(user) => {
                tracing::info!(user_id = %user.id, backend = %backend, "OAuth email belongs to a password account");
                Err(OAuthError::EmailInUse)
            }
            None => self.sign_up(backend, profile).await,
        }
    }

    async fn is_social(&self, user_id: Uuid) -> Result<bool, OAuthError> {
        self.social
            .is_linked(user_id)
            .await
            .map_err(|e| OAuthError::QueryError(e.to_string()))
    }

    async fn link(&self, user_id: Uuid, backend: OAuthBackend, uid: &str) -> Result<(), OAuthError> {
        match self.social.link(user_id, backend, uid).await {
            Ok(()) | Err(UserRepositoryError::UserAlreadyExists) => Ok(()),
            Err(e) => Err(OAuthError::RepositoryError(e.to_string())),
        }
    }

    async fn free_username(&self, profile: &OAuthProfile) -> Result<String, OAuthError> {
        let base = username_base(profile);

        for attempt in 0..USERNAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                base.clone()
            } else {
                let suffix = Uuid::new_v4().simple().to_string();
                format!("{}{}", base, &suffix[..USERNAME_SUFFIX_LEN])
            };

            let taken = self
                .query
                .username_exists(&candidate)
                .await
                .map_err(|e| OAuthError::QueryError(e.to_string()))?;
            if !taken {
                return Ok(candidate);
            }
        }

        Err(OAuthError::RepositoryError(format!(
            "No free username derived from {}",
            base
        )))
    }

    /// New accounts are active at once since the provider verified the email.
    /// Their password is random and never disclosed.
    async fn sign_up(
        &self,
        backend: OAuthBackend,
        profile: &OAuthProfile,
    ) -> Result<User, OAuthError> {
        let username = self.free_username(profile).await?;
        let password_hash = self
            .hasher
            .hash_password(&Uuid::new_v4().to_string())
            .await
            .map_err(|e| OAuthError::HashingFailed(e.to_string()))?;

        let created = self
            .repository
            .create(NewUser {
                username,
                email: profile.email.clone(),
                first_name: clean_name("First", &profile.first_name),
                last_name: clean_name("Last", &profile.last_name),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                UserRepositoryError::UserAlreadyExists => OAuthError::EmailInUse,
                other => OAuthError::RepositoryError(other.to_string()),
            })?;

        let user = self
            .repository
            .set_active(created.id, true)
            .await
            .map_err(|e| OAuthError::RepositoryError(e.to_string()))?;
        self.link(user.id, backend, &profile.uid).await?;

        tracing::info!(user_id = %user.id, backend = %backend, "User signed up through OAuth");
        Ok(user)
    }
}

#[async_trait]
impl IOAuthCallbackUseCase for OAuthCallbackUseCase {
    async fn execute(
        &self,
        backend_name: &str,
        params: OAuthCallbackParams,
    ) -> Result<SessionTokens, OAuthError> {
        let backend = resolve_backend(self.provider.as_ref(), backend_name)?;

        if let Some(error) = present(params.error.as_deref()) {
            tracing::info!(backend = %backend, error, "Provider reported an authorization error");
            return Err(OAuthError::AuthenticationFailed);
        }

        let (Some(code), Some(state)) = (
            present(params.code.as_deref()),
            present(params.state.as_deref()),
        ) else {
            return Err(OAuthError::AuthenticationFailed);
        };

        // 1. The state must be one we handed out and not used yet
        let pending = self
            .states
            .take_state(backend, state)
            .await
            .map_err(|e| OAuthError::StateStoreError(e.to_string()))?;
        if !pending {
            tracing::warn!(backend = %backend, "OAuth callback with unknown state");
            return Err(OAuthError::AuthenticationFailed);
        }

        // 2. Exchange the code for the provider profile
        let profile = self.provider.fetch_profile(backend, code).await?;

        // 3. Find, link or create the account
        let user = self.resolve_user(backend, &profile).await?;
        if !user.is_active {
            return Err(OAuthError::UserInactive);
        }

        // 4. Same session handling as a password login
        let access_token = self
            .tokens
            .current_or_issue(user.id, TokenPurpose::Access)
            .await
            .map_err(|e| OAuthError::TokenGenerationFailed(e.to_string()))?;
        let refresh_token = self
            .tokens
            .current_or_issue(user.id, TokenPurpose::Refresh)
            .await
            .map_err(|e| OAuthError::TokenGenerationFailed(e.to_string()))?;

        let user = self
            .repository
            .record_login(user.id, Utc::now())
            .await
            .map_err(|e| OAuthError::RepositoryError(e.to_string()))?;

        tracing::info!(user_id = %user.id, backend = %backend, "User logged in through OAuth");
        Ok(SessionTokens {
            user,
            access_token,
            refresh_token,
        })
    }
}
