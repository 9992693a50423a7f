#[cfg(test)]
pub mod mock_sender;
pub mod smtp_sender;

#[cfg(test)]
pub use mock_sender::MockEmailSender;
pub use smtp_sender::SmtpEmailSender;
