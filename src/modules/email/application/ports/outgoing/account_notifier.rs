use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::modules::users::application::domain::User;

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("Email sending failed: {0}")]
    EmailSendingFailed(String),
}

/// Token embedded in an emailed link.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeLink {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Every message an account can receive.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountNotice {
    Activation(NoticeLink),
    Welcome,
    DeactivationRequest(NoticeLink),
    Deactivated,
    DeletionRequest(NoticeLink),
    Deleted,
    EmailChangeRequest(NoticeLink),
    /// Sent to the previous address
    EmailChanged { old_email: String },
    /// Sent to the new address, carries an activation token
    EmailReactivation(NoticeLink),
    UsernameChangeRequest(NoticeLink),
    UsernameChanged,
    /// Carries a reactivation token
    UsernameReactivation(NoticeLink),
    ReactivationRequest(NoticeLink),
    Reactivated,
    PasswordResetRequest(NoticeLink),
    PasswordResetDone,
}

impl AccountNotice {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AccountNotice::Activation(_) => "activation",
            AccountNotice::Welcome => "welcome",
            AccountNotice::DeactivationRequest(_) => "deactivation_request",
            AccountNotice::Deactivated => "deactivated",
            AccountNotice::DeletionRequest(_) => "deletion_request",
            AccountNotice::Deleted => "deleted",
            AccountNotice::EmailChangeRequest(_) => "email_change_request",
            AccountNotice::EmailChanged { .. } => "email_changed",
            AccountNotice::EmailReactivation(_) => "email_reactivation",
            AccountNotice::UsernameChangeRequest(_) => "username_change_request",
            AccountNotice::UsernameChanged => "username_changed",
            AccountNotice::UsernameReactivation(_) => "username_reactivation",
            AccountNotice::ReactivationRequest(_) => "reactivation_request",
            AccountNotice::Reactivated => "reactivated",
            AccountNotice::PasswordResetRequest(_) => "password_reset_request",
            AccountNotice::PasswordResetDone => "password_reset_done",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountNotifier: Send + Sync {
    async fn notify(&self, user: &User, notice: AccountNotice) -> Result<(), NotificationError>;
}
