use crate::modules::users::application::ports::outgoing::{AccountMetrics, NoOpAccountMetrics};
use crate::modules::users::application::use_cases::{
    activate_user::IActivateUserUseCase, authenticate_user::IAuthenticateUserUseCase,
    confirm_deactivation::IConfirmDeactivationUseCase, confirm_deletion::IConfirmDeletionUseCase,
    confirm_email_change::IConfirmEmailChangeUseCase,
    confirm_password_reset::IConfirmPasswordResetUseCase,
    confirm_reactivation::IConfirmReactivationUseCase,
    confirm_username_change::IConfirmUsernameChangeUseCase, login_user::ILoginUserUseCase,
    logout_user::ILogoutUserUseCase, oauth_callback::IOAuthCallbackUseCase,
    oauth_login::IOAuthLoginUseCase, re_login::IReLoginUseCase,
    register_user::IRegisterUserUseCase, request_account_action::IRequestAccountActionUseCase,
    request_password_reset::IRequestPasswordResetUseCase,
    request_reactivation::IRequestReactivationUseCase,
};
use crate::tests::support::stubs::*;
use crate::AppState;
use actix_web::web;
use std::sync::Arc;

/// Every use case starts as a stub that answers with an error; tests swap in
/// the ones they exercise.
pub struct TestAppStateBuilder {
    register_user: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    activate_user: Arc<dyn IActivateUserUseCase + Send + Sync>,
    login_user: Arc<dyn ILoginUserUseCase + Send + Sync>,
    re_login: Arc<dyn IReLoginUseCase + Send + Sync>,
    logout_user: Arc<dyn ILogoutUserUseCase + Send + Sync>,
    authenticate_user: Arc<dyn IAuthenticateUserUseCase + Send + Sync>,
    request_account_action: Arc<dyn IRequestAccountActionUseCase + Send + Sync>,
    confirm_deactivation: Arc<dyn IConfirmDeactivationUseCase + Send + Sync>,
    confirm_deletion: Arc<dyn IConfirmDeletionUseCase + Send + Sync>,
    confirm_email_change: Arc<dyn IConfirmEmailChangeUseCase + Send + Sync>,
    confirm_username_change: Arc<dyn IConfirmUsernameChangeUseCase + Send + Sync>,
    request_reactivation: Arc<dyn IRequestReactivationUseCase + Send + Sync>,
    confirm_reactivation: Arc<dyn IConfirmReactivationUseCase + Send + Sync>,
    request_password_reset: Arc<dyn IRequestPasswordResetUseCase + Send + Sync>,
    confirm_password_reset: Arc<dyn IConfirmPasswordResetUseCase + Send + Sync>,
    oauth_login: Arc<dyn IOAuthLoginUseCase + Send + Sync>,
    oauth_callback: Arc<dyn IOAuthCallbackUseCase + Send + Sync>,
    metrics: Arc<dyn AccountMetrics>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            register_user: Arc::new(StubRegisterUserUseCase::default()),
            activate_user: Arc::new(StubUserLinkUseCase::default()),
            login_user: Arc::new(StubLoginUserUseCase::default()),
            re_login: Arc::new(StubReLoginUseCase::default()),
            logout_user: Arc::new(StubLogoutUserUseCase::default()),
            authenticate_user: Arc::new(StubAuthenticateUserUseCase::default()),
            request_account_action: Arc::new(StubRequestAccountActionUseCase::default()),
            confirm_deactivation: Arc::new(StubUserLinkUseCase::default()),
            confirm_deletion: Arc::new(StubConfirmDeletionUseCase::default()),
            confirm_email_change: Arc::new(StubConfirmEmailChangeUseCase::default()),
            confirm_username_change: Arc::new(StubConfirmUsernameChangeUseCase::default()),
            request_reactivation: Arc::new(StubIdentifierRequestUseCase::default()),
            confirm_reactivation: Arc::new(StubUserLinkUseCase::default()),
            request_password_reset: Arc::new(StubIdentifierRequestUseCase::default()),
            confirm_password_reset: Arc::new(StubConfirmPasswordResetUseCase::default()),
            oauth_login: Arc::new(StubOAuthLoginUseCase::default()),
            oauth_callback: Arc::new(StubOAuthCallbackUseCase::default()),
            metrics: Arc::new(NoOpAccountMetrics),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_register_user(
        mut self,
        uc: impl IRegisterUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.register_user = Arc::new(uc);
        self
    }

    pub fn with_activate_user(
        mut self,
        uc: impl IActivateUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.activate_user = Arc::new(uc);
        self
    }

    pub fn with_login_user(mut self, uc: impl ILoginUserUseCase + Send + Sync + 'static) -> Self {
        self.login_user = Arc::new(uc);
        self
    }

    pub fn with_re_login(mut self, uc: impl IReLoginUseCase + Send + Sync + 'static) -> Self {
        self.re_login = Arc::new(uc);
        self
    }

    pub fn with_logout_user(
        mut self,
        uc: impl ILogoutUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.logout_user = Arc::new(uc);
        self
    }

    pub fn with_authenticate_user(
        mut self,
        uc: impl IAuthenticateUserUseCase + Send + Sync + 'static,
    ) -> Self {
        self.authenticate_user = Arc::new(uc);
        self
    }

    pub fn with_request_account_action(
        mut self,
        uc: impl IRequestAccountActionUseCase + Send + Sync + 'static,
    ) -> Self {
        self.request_account_action = Arc::new(uc);
        self
    }

    pub fn with_confirm_deactivation(
        mut self,
        uc: impl IConfirmDeactivationUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_deactivation = Arc::new(uc);
        self
    }

    pub fn with_confirm_deletion(
        mut self,
        uc: impl IConfirmDeletionUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_deletion = Arc::new(uc);
        self
    }

    pub fn with_confirm_email_change(
        mut self,
        uc: impl IConfirmEmailChangeUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_email_change = Arc::new(uc);
        self
    }

    pub fn with_confirm_username_change(
        mut self,
        uc: impl IConfirmUsernameChangeUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_username_change = Arc::new(uc);
        self
    }

    pub fn with_request_reactivation(
        mut self,
        uc: impl IRequestReactivationUseCase + Send + Sync + 'static,
    ) -> Self {
        self.request_reactivation = Arc::new(uc);
        self
    }

    pub fn with_confirm_reactivation(
        mut self,
        uc: impl IConfirmReactivationUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_reactivation = Arc::new(uc);
        self
    }

    pub fn with_request_password_reset(
        mut self,
        uc: impl IRequestPasswordResetUseCase + Send + Sync + 'static,
    ) -> Self {
        self.request_password_reset = Arc::new(uc);
        self
    }

    pub fn with_confirm_password_reset(
        mut self,
        uc: impl IConfirmPasswordResetUseCase + Send + Sync + 'static,
    ) -> Self {
        self.confirm_password_reset = Arc::new(uc);
        self
    }

    pub fn with_oauth_login(
        mut self,
        uc: impl IOAuthLoginUseCase + Send + Sync + 'static,
    ) -> Self {
        self.oauth_login = Arc::new(uc);
        self
    }

    pub fn with_oauth_callback(
        mut self,
        uc: impl IOAuthCallbackUseCase + Send + Sync + 'static,
    ) -> Self {
        self.oauth_callback = Arc::new(uc);
        self
    }

    pub fn with_metrics(mut self, metrics: impl AccountMetrics + 'static) -> Self {
        self.metrics = Arc::new(metrics);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            register_user_use_case: self.register_user,
            activate_user_use_case: self.activate_user,
            login_user_use_case: self.login_user,
            re_login_use_case: self.re_login,
            logout_user_use_case: self.logout_user,
            authenticate_user_use_case: self.authenticate_user,
            request_account_action_use_case: self.request_account_action,
            confirm_deactivation_use_case: self.confirm_deactivation,
            confirm_deletion_use_case: self.confirm_deletion,
            confirm_email_change_use_case: self.confirm_email_change,
            confirm_username_change_use_case: self.confirm_username_change,
            request_reactivation_use_case: self.request_reactivation,
            confirm_reactivation_use_case: self.confirm_reactivation,
            request_password_reset_use_case: self.request_password_reset,
            confirm_password_reset_use_case: self.confirm_password_reset,
            oauth_login_use_case: self.oauth_login,
            oauth_callback_use_case: self.oauth_callback,
            metrics: self.metrics,
        })
    }
}
