pub mod account_email_service;
pub mod delivery;
pub mod retry;

pub use account_email_service::AccountEmailService;
pub use delivery::notify_logged;
pub use retry::notify_with_retry;
