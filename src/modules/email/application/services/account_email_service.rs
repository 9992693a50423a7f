use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::fmt;
use std::sync::Arc;

use crate::modules::email::application::ports::outgoing::{
    AccountNotice, AccountNotifier, EmailSender, NoticeLink, NotificationError,
};
use crate::modules::users::application::domain::User;

struct RenderedEmail {
    to: String,
    subject: String,
    html: String,
}

/// Renders account notices as HTML and hands them to an `EmailSender`.
#[derive(Clone)]
pub struct AccountEmailService {
    sender: Arc<dyn EmailSender>,
    project_name: String,
    base_url: String,
}

impl fmt::Debug for AccountEmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountEmailService")
            .field("sender", &"<dyn EmailSender>")
            .field("project_name", &self.project_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AccountEmailService {
    pub fn new(
        sender: Arc<dyn EmailSender>,
        project_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            project_name: project_name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/users/{}", self.base_url, path)
    }

    fn link_paragraph(&self, action: &str, path: String, link: &NoticeLink) -> String {
        let url = self.url(&path);
        format!(
            "<p><a href=\"{url}\">{action}</a></p>\
             <p>This link expires on {} UTC.</p>\
             <p>If the button does not work, copy this address into your browser:<br>{url}</p>",
            link.expires_at.format("%Y-%m-%d %H:%M")
        )
    }

    fn render(&self, user: &User, notice: &AccountNotice) -> RenderedEmail {
        let p = &self.project_name;
        let mut to = user.email.clone();

        let (subject, body) = match notice {
            AccountNotice::Activation(link) => (
                format!("Activate Your {p} Account"),
                format!(
                    "<p>Thanks for signing up. Activate your account to start using {p}.</p>{}",
                    self.link_paragraph("Activate Account", format!("activate/{}/", link.token), link)
                ),
            ),
            AccountNotice::Welcome => (
                format!("Welcome To {p}"),
                format!("<p>Your account is now active. Welcome to {p}!</p>"),
            ),
            AccountNotice::DeactivationRequest(link) => (
                format!("Deactivate Your {p} Account"),
                format!(
                    "<p>We received a request to deactivate your account.</p>{}",
                    self.link_paragraph(
                        "Deactivate Account",
                        format!("deactivate/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::Deactivated => (
                format!("Your {p} Account Has Been Deactivated"),
                format!(
                    "<p>Your account has been deactivated. You can reactivate it at any time:</p>\
                     <p><a href=\"{url}\">{url}</a></p>",
                    url = self.url("reactivate/request/")
                ),
            ),
            AccountNotice::DeletionRequest(link) => (
                format!("Delete Your {p} Account"),
                format!(
                    "<p>We received a request to permanently delete your account.</p>{}",
                    self.link_paragraph(
                        "Delete Account",
                        format!("delete/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::Deleted => (
                format!("Your {p} Account Has Been Deleted"),
                "<p>Your account and its data have been deleted.</p>".to_string(),
            ),
            AccountNotice::EmailChangeRequest(link) => (
                format!("Change Your {p} Email"),
                format!(
                    "<p>We received a request to change the email address of your account.</p>{}",
                    self.link_paragraph(
                        "Change Email",
                        format!("change-email/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::EmailChanged { old_email } => {
                to = old_email.clone();
                (
                    format!("Your {p} Email Was Updated"),
                    format!(
                        "<p>The email address of your account was changed to {}.</p>",
                        user.email
                    ),
                )
            }
            AccountNotice::EmailReactivation(link) => (
                format!("Re-Activate Your {p} Account"),
                format!(
                    "<p>Your email address was updated. Activate your account again to sign in.</p>{}",
                    self.link_paragraph("Activate Account", format!("activate/{}/", link.token), link)
                ),
            ),
            AccountNotice::UsernameChangeRequest(link) => (
                format!("Change Your {p} Username"),
                format!(
                    "<p>We received a request to change your username.</p>{}",
                    self.link_paragraph(
                        "Change Username",
                        format!("change-username/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::UsernameChanged => (
                format!("Your {p} Username Was Updated"),
                format!(
                    "<p>Your username is now <strong>{}</strong>.</p>",
                    user.username
                ),
            ),
            AccountNotice::UsernameReactivation(link) => (
                format!("Re-Activate Your {p} Account"),
                format!(
                    "<p>Your username was updated. Reactivate your account to sign in.</p>{}",
                    self.link_paragraph(
                        "Reactivate Account",
                        format!("reactivate/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::ReactivationRequest(link) => (
                format!("Reactivate Your {p} Account"),
                format!(
                    "<p>We received a request to reactivate your account.</p>{}",
                    self.link_paragraph(
                        "Reactivate Account",
                        format!("reactivate/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::Reactivated => (
                format!("Your {p} Account Has Been Reactivated"),
                format!(
                    "<p>Your account is active again. You can log in here:</p>\
                     <p><a href=\"{url}\">{url}</a></p>",
                    url = self.url("login/")
                ),
            ),
            AccountNotice::PasswordResetRequest(link) => (
                format!("Reset Your {p} Password"),
                format!(
                    "<p>We received a request to reset your password.</p>{}",
                    self.link_paragraph(
                        "Reset Password",
                        format!("reset-password/confirm/{}/", link.token),
                        link
                    )
                ),
            ),
            AccountNotice::PasswordResetDone => (
                format!("Your {p} Password Has Been Reset"),
                format!(
                    "<p>Your password was changed. You can log in with it here:</p>\
                     <p><a href=\"{url}\">{url}</a></p>",
                    url = self.url("login/")
                ),
            ),
        };

        let html = format!(
            "<html><body>\
             <p>Hi {first_name},</p>\
             {body}\
             <p>If you did not request this, you can ignore this email.</p>\
             <hr><p>&copy; {year} {p}</p>\
             </body></html>",
            first_name = user.first_name,
            year = Utc::now().year(),
        );

        RenderedEmail { to, subject, html }
    }
}

#[async_trait]
impl AccountNotifier for AccountEmailService {
    async fn notify(&self, user: &User, notice: AccountNotice) -> Result<(), NotificationError> {
        let email = self.render(user, &notice);

        self.sender
            .send_email(&email.to, &email.subject, &email.html)
            .await
            .map_err(|e| NotificationError::EmailSendingFailed(e.to_string()))?;

        tracing::info!(user_id = %user.id, notice = notice.kind(), "Account email sent");
        Ok(())
    }
}
