use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::application::domain::User;
use crate::modules::users::application::services::TokenLifecycleError;
use crate::modules::users::application::use_cases::{
    activate_user::IActivateUserUseCase,
    authenticate_user::IAuthenticateUserUseCase,
    confirm_deactivation::IConfirmDeactivationUseCase,
    confirm_deletion::IConfirmDeletionUseCase,
    confirm_email_change::{ChangeEmailRequest, IConfirmEmailChangeUseCase},
    confirm_password_reset::{IConfirmPasswordResetUseCase, NewPasswordRequest},
    confirm_reactivation::IConfirmReactivationUseCase,
    confirm_username_change::{ChangeUsernameRequest, IConfirmUsernameChangeUseCase},
    login_user::{ILoginUserUseCase, LoginError, LoginRequest},
    logout_user::ILogoutUserUseCase,
    oauth_callback::IOAuthCallbackUseCase,
    oauth_login::IOAuthLoginUseCase,
    re_login::IReLoginUseCase,
    register_user::{IRegisterUserUseCase, RegisterUserRequest},
    request_account_action::IRequestAccountActionUseCase,
    request_password_reset::IRequestPasswordResetUseCase,
    request_reactivation::IRequestReactivationUseCase,
    AccountAction, AccountFlowError, IdentifierRequest, OAuthCallbackParams, OAuthError,
    SessionError, SessionTokens,
};
use crate::shared::validation::FieldErrors;

fn not_configured() -> AccountFlowError {
    AccountFlowError::TokenError("Not used in this test".to_string())
}

// ============================ Register ============================
#[derive(Clone)]
pub struct StubRegisterUserUseCase {
    result: Result<User, AccountFlowError>,
    last_request: Arc<Mutex<Option<RegisterUserRequest>>>,
}

impl Default for StubRegisterUserUseCase {
    fn default() -> Self {
        Self::returning(Err(not_configured()))
    }
}

impl StubRegisterUserUseCase {
    pub fn returning(result: Result<User, AccountFlowError>) -> Self {
        Self {
            result,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn last_request(&self) -> Option<RegisterUserRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl IRegisterUserUseCase for StubRegisterUserUseCase {
    async fn execute(&self, request: RegisterUserRequest) -> Result<User, AccountFlowError> {
        *self.last_request.lock().unwrap() = Some(request);
        self.result.clone()
    }
}

// ============================ Link flows returning the user ============================
/// Stands in for every `execute(token) -> User` flow: activate, confirm
/// deactivation and confirm reactivation.
#[derive(Clone)]
pub struct StubUserLinkUseCase {
    result: Result<User, AccountFlowError>,
    tokens: Arc<Mutex<Vec<String>>>,
}

impl Default for StubUserLinkUseCase {
    fn default() -> Self {
        Self::returning(Err(not_configured()))
    }
}

impl StubUserLinkUseCase {
    pub fn returning(result: Result<User, AccountFlowError>) -> Self {
        Self {
            result,
            tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn received_tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn answer(&self, token: &str) -> Result<User, AccountFlowError> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.result.clone()
    }
}

#[async_trait]
impl IActivateUserUseCase for StubUserLinkUseCase {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError> {
        self.answer(token)
    }
}

#[async_trait]
impl IConfirmDeactivationUseCase for StubUserLinkUseCase {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError> {
        self.answer(token)
    }
}

#[async_trait]
impl IConfirmReactivationUseCase for StubUserLinkUseCase {
    async fn execute(&self, token: &str) -> Result<User, AccountFlowError> {
        self.answer(token)
    }
}

// ============================ Confirm Deletion ============================
#[derive(Clone)]
pub struct StubConfirmDeletionUseCase {
    result: Result<(), AccountFlowError>,
}

impl Default for StubConfirmDeletionUseCase {
    fn default() -> Self {
        Self::returning(Err(not_configured()))
    }
}

impl StubConfirmDeletionUseCase {
    pub fn returning(result: Result<(), AccountFlowError>) -> Self {
        Self { result }
    }
}

#[async_trait]
impl IConfirmDeletionUseCase for StubConfirmDeletionUseCase {
    async fn execute(&self, _token: &str) -> Result<(), AccountFlowError> {
        self.result.clone()
    }
}

// ============================ Login / Re-login ============================
#[derive(Clone)]
pub struct StubLoginUserUseCase {
    result: Result<SessionTokens, LoginError>,
    last_request: Arc<Mutex<Option<LoginRequest>>>,
}

impl Default for StubLoginUserUseCase {
    fn default() -> Self {
        Self::returning(Err(LoginError::InvalidCredentials))
    }
}

impl StubLoginUserUseCase {
    pub fn returning(result: Result<SessionTokens, LoginError>) -> Self {
        Self {
            result,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn last_request(&self) -> Option<LoginRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ILoginUserUseCase for StubLoginUserUseCase {
    async fn execute(&self, request: LoginRequest) -> Result<SessionTokens, LoginError> {
        *self.last_request.lock().unwrap() = Some(request);
        self.result.clone()
    }
}

// ============================ OAuth ============================
#[derive(Clone)]
pub struct StubOAuthLoginUseCase {
    result: Result<String, OAuthError>,
    backends: Arc<Mutex<Vec<String>>>,
}

impl Default for StubOAuthLoginUseCase {
    fn default() -> Self {
        Self::returning(Err(OAuthError::UnknownBackend))
    }
}

impl StubOAuthLoginUseCase {
    pub fn returning(result: Result<String, OAuthError>) -> Self {
        Self {
            result,
            backends: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn received_backends(&self) -> Vec<String> {
        self.backends.lock().unwrap().clone()
    }
}

#[async_trait]
impl IOAuthLoginUseCase for StubOAuthLoginUseCase {
    async fn execute(&self, backend_name: &str) -> Result<String, OAuthError> {
        self.backends.lock().unwrap().push(backend_name.to_string());
        self.result.clone()
    }
}

#[derive(Clone)]
pub struct StubOAuthCallbackUseCase {
    result: Result<SessionTokens, OAuthError>,
    last_call: Arc<Mutex<Option<(String, OAuthCallbackParams)>>>,
}

impl Default for StubOAuthCallbackUseCase {
    fn default() -> Self {
        Self::returning(Err(OAuthError::UnknownBackend))
    }
}

impl StubOAuthCallbackUseCase {
    pub fn returning(result: Result<SessionTokens, OAuthError>) -> Self {
        Self {
            result,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    pub fn last_call(&self) -> Option<(String, OAuthCallbackParams)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl IOAuthCallbackUseCase for StubOAuthCallbackUseCase {
    async fn execute(
        &self,
        backend_name: &str,
        params: OAuthCallbackParams,
    ) -> Result<SessionTokens, OAuthError> {
        *self.last_call.lock().unwrap() = Some((backend_name.to_string(), params));
        self.result.clone()
    }
}

#[derive(Clone)]
pub struct StubReLoginUseCase {
    result: Result<SessionTokens, SessionError>,
}

impl Default for StubReLoginUseCase {
    fn default() -> Self {
        Self::returning(Err(SessionError::InvalidToken))
    }
}

impl StubReLoginUseCase {
    pub fn returning(result: Result<SessionTokens, SessionError>) -> Self {
        Self { result }
    }
}

#[async_trait]
impl IReLoginUseCase for StubReLoginUseCase {
    async fn execute(&self, _refresh_token: &str) -> Result<SessionTokens, SessionError> {
        self.result.clone()
    }
}

// ============================ Authenticate / Logout ============================
/// Accepts only `expected` when set; any other token is `InvalidToken`.
#[derive(Clone)]
pub struct StubAuthenticateUserUseCase {
    expected: Option<String>,
    result: Result<User, SessionError>,
}

impl Default for StubAuthenticateUserUseCase {
    fn default() -> Self {
        Self::returning(Err(SessionError::InvalidToken))
    }
}

impl StubAuthenticateUserUseCase {
    pub fn returning(result: Result<User, SessionError>) -> Self {
        Self {
            expected: None,
            result,
        }
    }

    pub fn expecting(token: &str, result: Result<User, SessionError>) -> Self {
        Self {
            expected: Some(token.to_string()),
            result,
        }
    }
}

#[async_trait]
impl IAuthenticateUserUseCase for StubAuthenticateUserUseCase {
    async fn execute(&self, access_token: &str) -> Result<User, SessionError> {
        match &self.expected {
            Some(expected) if expected != access_token => Err(SessionError::InvalidToken),
            _ => self.result.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct StubLogoutUserUseCase {
    fail_with: Option<TokenLifecycleError>,
    calls: Arc<Mutex<Vec<Uuid>>>,
}

impl StubLogoutUserUseCase {
    pub fn failing(err: TokenLifecycleError) -> Self {
        Self {
            fail_with: Some(err),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Uuid> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ILogoutUserUseCase for StubLogoutUserUseCase {
    async fn execute(&self, user_id: Uuid) -> Result<(), TokenLifecycleError> {
        self.calls.lock().unwrap().push(user_id);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// ============================ Request Account Action ============================
#[derive(Clone, Default)]
pub struct StubRequestAccountActionUseCase {
    fail_with: Option<AccountFlowError>,
    actions: Arc<Mutex<Vec<(Uuid, AccountAction)>>>,
}

impl StubRequestAccountActionUseCase {
    pub fn failing(err: AccountFlowError) -> Self {
        Self {
            fail_with: Some(err),
            actions: Arc::default(),
        }
    }

    pub fn actions(&self) -> Vec<(Uuid, AccountAction)> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl IRequestAccountActionUseCase for StubRequestAccountActionUseCase {
    async fn execute(&self, user: &User, action: AccountAction) -> Result<(), AccountFlowError> {
        self.actions.lock().unwrap().push((user.id, action));
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

// ============================ Confirm with payload ============================
/// Token failures configured in `result` win over payload errors, the way
/// the real flows check the link before the body.
fn token_then_payload<T, R>(
    result: &Result<T, AccountFlowError>,
    request: Result<R, FieldErrors>,
) -> Result<T, AccountFlowError>
where
    T: Clone,
{
    let value = result.clone()?;
    request.map_err(AccountFlowError::Validation)?;
    Ok(value)
}

#[derive(Clone)]
pub struct StubConfirmEmailChangeUseCase {
    result: Result<User, AccountFlowError>,
    last_request: Arc<Mutex<Option<ChangeEmailRequest>>>,
}

impl Default for StubConfirmEmailChangeUseCase {
    fn default() -> Self {
        Self::returning(Err(not_configured()))
    }
}

impl StubConfirmEmailChangeUseCase {
    pub fn returning(result: Result<User, AccountFlowError>) -> Self {
        Self {
            result,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn last_request(&self) -> Option<ChangeEmailRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl IConfirmEmailChangeUseCase for StubConfirmEmailChangeUseCase {
    async fn execute(
        &self,
        _token: &str,
        request: Result<ChangeEmailRequest, FieldErrors>,
    ) -> Result<User, AccountFlowError> {
        if let Ok(accepted) = &request {
            *self.last_request.lock().unwrap() = Some(accepted.clone());
        }
        token_then_payload(&self.result, request)
    }
}

#[derive(Clone)]
pub struct StubConfirmUsernameChangeUseCase {
    result: Result<User, AccountFlowError>,
}

impl Default for StubConfirmUsernameChangeUseCase {
    fn default() -> Self {
        Self::returning(Err(not_configured()))
    }
}

impl StubConfirmUsernameChangeUseCase {
    pub fn returning(result: Result<User, AccountFlowError>) -> Self {
        Self { result }
    }
}

#[async_trait]
impl IConfirmUsernameChangeUseCase for StubConfirmUsernameChangeUseCase {
    async fn execute(
        &self,
        _token: &str,
        request: Result<ChangeUsernameRequest, FieldErrors>,
    ) -> Result<User, AccountFlowError> {
        token_then_payload(&self.result, request)
    }
}

#[derive(Clone)]
pub struct StubConfirmPasswordResetUseCase {
    result: Result<(), AccountFlowError>,
}

impl Default for StubConfirmPasswordResetUseCase {
    fn default() -> Self {
        Self::returning(Err(not_configured()))
    }
}

impl StubConfirmPasswordResetUseCase {
    pub fn returning(result: Result<(), AccountFlowError>) -> Self {
        Self { result }
    }
}

#[async_trait]
impl IConfirmPasswordResetUseCase for StubConfirmPasswordResetUseCase {
    async fn execute(
        &self,
        _token: &str,
        request: Result<NewPasswordRequest, FieldErrors>,
    ) -> Result<(), AccountFlowError> {
        token_then_payload(&self.result, request)
    }
}

// ============================ Identifier requests ============================
/// Stands in for the reactivation and password reset requests.
#[derive(Clone, Default)]
pub struct StubIdentifierRequestUseCase {
    fail_with: Option<AccountFlowError>,
    identifiers: Arc<Mutex<Vec<String>>>,
}

impl StubIdentifierRequestUseCase {
    pub fn failing(err: AccountFlowError) -> Self {
        Self {
            fail_with: Some(err),
            identifiers: Arc::default(),
        }
    }

    pub fn identifiers(&self) -> Vec<String> {
        self.identifiers.lock().unwrap().clone()
    }

    fn answer(&self, request: IdentifierRequest) -> Result<(), AccountFlowError> {
        self.identifiers
            .lock()
            .unwrap()
            .push(request.identifier().to_string());
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IRequestReactivationUseCase for StubIdentifierRequestUseCase {
    async fn execute(&self, request: IdentifierRequest) -> Result<(), AccountFlowError> {
        self.answer(request)
    }
}

#[async_trait]
impl IRequestPasswordResetUseCase for StubIdentifierRequestUseCase {
    async fn execute(&self, request: IdentifierRequest) -> Result<(), AccountFlowError> {
        self.answer(request)
    }
}
