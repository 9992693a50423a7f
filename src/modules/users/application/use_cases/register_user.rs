use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::email::application::services::notify_with_retry;
use crate::modules::users::application::domain::validation::{
    normalize_email, normalize_person_name, normalize_username, validate_password,
};
use crate::modules::users::application::domain::{NewUser, TokenPurpose, User};
use crate::modules::users::application::ports::outgoing::{
    PasswordHasher, UserQuery, UserRepository, UserRepositoryError,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::account_flow::AccountFlowError;
use crate::shared::validation::FieldErrors;

const ACTIVATION_EMAIL_ATTEMPTS: u32 = 3;
const ACTIVATION_EMAIL_BACKOFF: Duration = Duration::from_millis(500);

// ========================= Register Request =========================
/// Sign-up payload with every field normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterUserRequest {
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password: String,
}

impl RegisterUserRequest {
    /// Missing fields come in as `None` so each one gets its own "Is Required" message.
    pub fn new(
        username: Option<String>,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        password: Option<String>,
        re_password: Option<String>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = errors.check(
            "username",
            normalize_username(username.as_deref().unwrap_or_default()),
        );
        let email = errors.check(
            "email",
            normalize_email(email.as_deref().unwrap_or_default()),
        );
        let first_name = errors.check(
            "first_name",
            normalize_person_name("First", first_name.as_deref().unwrap_or_default()),
        );
        let last_name = errors.check(
            "last_name",
            normalize_person_name("Last", last_name.as_deref().unwrap_or_default()),
        );
        let password = errors.check(
            "password",
            validate_password(password.as_deref().unwrap_or_default()),
        );

        let re_password = re_password.unwrap_or_default();
        if re_password.is_empty() {
            errors.add("re_password", "Password Confirmation Is Required");
        }

        match (username, email, first_name, last_name, password) {
            (Some(username), Some(email), Some(first_name), Some(last_name), Some(password))
                if errors.is_empty() =>
            {
                if password != re_password {
                    return Err(FieldErrors::single("password", "Passwords Do Not Match"));
                }
                Ok(Self {
                    username,
                    email,
                    first_name,
                    last_name,
                    password,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// ========================= Register Use Case =========================
#[async_trait]
pub trait IRegisterUserUseCase: Send + Sync {
    async fn execute(&self, request: RegisterUserRequest) -> Result<User, AccountFlowError>;
}

pub struct RegisterUserUseCase {
    query: Arc<dyn UserQuery>,
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenLifecycle,
    notifier: Arc<dyn AccountNotifier>,
}

impl RegisterUserUseCase {
    pub fn new(
        query: Arc<dyn UserQuery>,
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenLifecycle,
        notifier: Arc<dyn AccountNotifier>,
    ) -> Self {
        Self {
            query,
            repository,
            hasher,
            tokens,
            notifier,
        }
    }

    /// Per-field "Already Exists" messages for whatever is taken.
    async fn taken_fields(&self, username: &str, email: &str) -> Result<FieldErrors, AccountFlowError> {
        let mut errors = FieldErrors::default();
        if self.query.username_exists(username).await? {
            errors.add("username", "Username Already Exists");
        }
        if self.query.email_exists(email).await? {
            errors.add("email", "Email Already Exists");
        }
        Ok(errors)
    }
}

#[async_trait]
impl IRegisterUserUseCase for RegisterUserUseCase {
    async fn execute(&self, request: RegisterUserRequest) -> Result<User, AccountFlowError> {
        let taken = self.taken_fields(request.username(), request.email()).await?;
        if !taken.is_empty() {
            return Err(AccountFlowError::Validation(taken));
        }

        let password_hash = self.hasher.hash_password(request.password()).await?;

        let created = self
            .repository
            .create(NewUser {
                username: request.username().to_string(),
                email: request.email().to_string(),
                first_name: request.first_name().to_string(),
                last_name: request.last_name().to_string(),
                password_hash,
            })
            .await;

        let user = match created {
            Ok(user) => user,
            // Lost a race against a concurrent sign-up
            Err(UserRepositoryError::UserAlreadyExists) => {
                let mut taken = self.taken_fields(request.username(), request.email()).await?;
                if taken.is_empty() {
                    taken.add("username", "Username Already Exists");
                }
                return Err(AccountFlowError::Validation(taken));
            }
            Err(e) => return Err(e.into()),
        };

        let token = self
            .tokens
            .issue(user.id, TokenPurpose::Activation)
            .await
            .map_err(|e| AccountFlowError::TokenError(e.to_string()))?;
        let link = self.tokens.link(token, TokenPurpose::Activation);

        let notifier = self.notifier.clone();
        let recipient = user.clone();
        tokio::spawn(async move {
            if let Err(e) = notify_with_retry(
                notifier,
                &recipient,
                AccountNotice::Activation(link),
                ACTIVATION_EMAIL_ATTEMPTS,
                ACTIVATION_EMAIL_BACKOFF,
            )
            .await
            {
                tracing::error!(user_id = %recipient.id, "Activation email was not delivered: {}", e);
            }
        });

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}
