use crate::modules::email::application::ports::outgoing::{AccountNotice, AccountNotifier};
use crate::modules::users::application::domain::User;

/// Sends a notice about a change that is already committed. A failed send is
/// logged and swallowed.
pub async fn notify_logged(notifier: &dyn AccountNotifier, user: &User, notice: AccountNotice) {
    let kind = notice.kind();
    if let Err(e) = notifier.notify(user, notice).await {
        tracing::error!(user_id = %user.id, notice = kind, "Failed to send account email: {}", e);
    }
}
