use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    message::header::ContentType, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::modules::email::application::ports::outgoing::{EmailSendError, EmailSender};
use crate::shared::config::{self, ConfigError};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Message) -> Result<(), String>;
}

#[async_trait]
impl Mailer for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, email: Message) -> Result<(), String> {
        AsyncTransport::send(self, email)
            .await
            .map(|_resp| ())
            .map_err(|e| e.to_string())
    }
}

pub struct SmtpEmailSender {
    mailer: Box<dyn Mailer>,
    from_email: String,
}

impl SmtpEmailSender {
    pub fn new_with_mailer(mailer: Box<dyn Mailer>, from_email: &str) -> Self {
        Self {
            mailer,
            from_email: from_email.to_string(),
        }
    }

    /// TLS relay with credentials.
    pub fn new(
        smtp_server: &str,
        smtp_username: &str,
        smtp_password: &str,
        from_email: &str,
    ) -> Result<Self, EmailSendError> {
        let creds = Credentials::new(smtp_username.to_string(), smtp_password.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_server)
            .map_err(|e| EmailSendError::Transport(e.to_string()))?
            .credentials(creds)
            .build();

        Ok(Self::new_with_mailer(Box::new(transport), from_email))
    }

    // Local/test constructor (Mailpit, MailHog, etc.)
    pub fn new_local(host: &str, port: u16, from_email: &str) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self::new_with_mailer(Box::new(transport), from_email)
    }

    /// Plain local SMTP when `RUST_ENV=test`, authenticated relay otherwise.
    pub fn from_env(environment: &str) -> Result<Self, ConfigError> {
        if environment == "test" {
            let host = config::optional("SMTP_HOST").unwrap_or_else(|| "localhost".to_string());
            let port: u16 = config::parse_or("SMTP_PORT", 1025)?;
            let from_email = config::optional("EMAIL_FROM")
                .unwrap_or_else(|| "no-reply@localhost".to_string());
            return Ok(Self::new_local(&host, port, &from_email));
        }

        let smtp_server = config::required("SMTP_SERVER")?;
        let smtp_username = config::required("SMTP_USERNAME")?;
        let smtp_password = config::required("SMTP_PASSWORD")?;
        let from_email = config::required("EMAIL_FROM")?;

        Self::new(&smtp_server, &smtp_username, &smtp_password, &from_email).map_err(|e| {
            ConfigError::Invalid {
                key: "SMTP_SERVER".to_string(),
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailSendError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e| EmailSendError::InvalidAddress(format!("{:?}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| EmailSendError::InvalidAddress(format!("{:?}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| EmailSendError::InvalidMessage(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(EmailSendError::Transport)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingMailer {
        subjects: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: Message) -> Result<(), String> {
            let subject = email
                .headers()
                .get_raw("Subject")
                .unwrap_or_default()
                .to_string();
            self.subjects.lock().unwrap().push(subject);
            Ok(())
        }
    }

    struct PanickingMailer;

    #[async_trait]
    impl Mailer for PanickingMailer {
        async fn send(&self, _: Message) -> Result<(), String> {
            panic!("Should not reach mailer when the message is invalid");
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _: Message) -> Result<(), String> {
            Err("connection refused".to_string())
        }
    }

    #[tokio::test]
    async fn test_send_email_success_unit() {
        let mailer = RecordingMailer::default();
        let subjects = mailer.subjects.clone();
        let sender = SmtpEmailSender::new_with_mailer(Box::new(mailer), "sender@example.com");

        let result = sender
            .send_email("recipient@example.com", "Welcome To InitStack", "<p>Hi</p>")
            .await;

        assert!(result.is_ok(), "Expected Ok, got {:?}", result);
        assert_eq!(subjects.lock().unwrap().as_slice(), ["Welcome To InitStack"]);
    }

    #[tokio::test]
    async fn test_send_email_invalid_from_address() {
        let sender = SmtpEmailSender::new_with_mailer(Box::new(PanickingMailer), "invalid-from");

        let result = sender
            .send_email("recipient@example.com", "Subject", "<p>Test</p>")
            .await;

        assert!(matches!(result, Err(EmailSendError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_send_email_invalid_to_address() {
        let sender =
            SmtpEmailSender::new_with_mailer(Box::new(PanickingMailer), "sender@example.com");

        let result = sender
            .send_email("not-an-email", "Subject", "<p>Test</p>")
            .await;

        assert!(matches!(result, Err(EmailSendError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_send_email_transport_failure() {
        let sender = SmtpEmailSender::new_with_mailer(Box::new(FailingMailer), "sender@example.com");

        let result = sender
            .send_email("to@example.com", "Subject", "<p>Body</p>")
            .await;

        assert_eq!(
            result,
            Err(EmailSendError::Transport("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn test_local_sender_from_env_in_test_mode() {
        assert!(SmtpEmailSender::from_env("test").is_ok());
    }
}
