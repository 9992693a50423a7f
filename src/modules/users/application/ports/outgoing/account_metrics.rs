//! Port for account-level counters. HTTP request metrics are collected by the
//! middleware; this covers what only the application knows about.

use crate::modules::users::application::domain::TokenPurpose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Register,
    Activate,
    Login,
    ReLogin,
    Logout,
    DeactivateRequest,
    DeactivateConfirm,
    DeleteRequest,
    DeleteConfirm,
    ChangeEmailRequest,
    ChangeEmailConfirm,
    ChangeUsernameRequest,
    ChangeUsernameConfirm,
    ReactivateRequest,
    ReactivateConfirm,
    ResetPasswordRequest,
    ResetPasswordConfirm,
    OAuthLogin,
    OAuthCallback,
}

impl UserAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::Register => "register",
            UserAction::Activate => "activate",
            UserAction::Login => "login",
            UserAction::ReLogin => "re_login",
            UserAction::Logout => "logout",
            UserAction::DeactivateRequest => "deactivate_request",
            UserAction::DeactivateConfirm => "deactivate_confirm",
            UserAction::DeleteRequest => "delete_request",
            UserAction::DeleteConfirm => "delete_confirm",
            UserAction::ChangeEmailRequest => "change_email_request",
            UserAction::ChangeEmailConfirm => "change_email_confirm",
            UserAction::ChangeUsernameRequest => "change_username_request",
            UserAction::ChangeUsernameConfirm => "change_username_confirm",
            UserAction::ReactivateRequest => "reactivate_request",
            UserAction::ReactivateConfirm => "reactivate_confirm",
            UserAction::ResetPasswordRequest => "reset_password_request",
            UserAction::ResetPasswordConfirm => "reset_password_confirm",
            UserAction::OAuthLogin => "oauth_login",
            UserAction::OAuthCallback => "oauth_callback",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AccountMetrics: Send + Sync {
    fn record_user_action(&self, action: UserAction, success: bool);
    fn record_tokens_revoked(&self, purpose: TokenPurpose);
    fn record_cache_operation(&self, operation: &'static str, success: bool);
    fn record_token_validation(&self, purpose: TokenPurpose, success: bool);
    fn record_users_purged(&self, count: u64);
    /// `endpoint` is "health" or "ready"; `status` is the answered status.
    fn record_health_check(&self, endpoint: &'static str, status: &'static str, duration_secs: f64);
}

/// Discards everything. Used by tests and when no registry is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAccountMetrics;

impl AccountMetrics for NoOpAccountMetrics {
    fn record_user_action(&self, _action: UserAction, _success: bool) {}
    fn record_tokens_revoked(&self, _purpose: TokenPurpose) {}
    fn record_cache_operation(&self, _operation: &'static str, _success: bool) {}
    fn record_token_validation(&self, _purpose: TokenPurpose, _success: bool) {}
    fn record_users_purged(&self, _count: u64) {}
    fn record_health_check(&self, _endpoint: &'static str, _status: &'static str, _secs: f64) {}
}
