pub mod account_notifier;
pub mod email_sender;

pub use account_notifier::{AccountNotice, AccountNotifier, NoticeLink, NotificationError};
pub use email_sender::{EmailSendError, EmailSender};
