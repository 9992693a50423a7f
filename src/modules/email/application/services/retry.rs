use std::sync::Arc;
use std::time::Duration;

use crate::modules::email::application::ports::outgoing::{
    AccountNotice, AccountNotifier, NotificationError,
};
use crate::modules::users::application::domain::User;

/// Sends `notice`, retrying up to `attempts` times. The delay doubles after
/// every failed attempt.
pub async fn notify_with_retry(
    notifier: Arc<dyn AccountNotifier>,
    user: &User,
    notice: AccountNotice,
    attempts: u32,
    initial_delay: Duration,
) -> Result<(), NotificationError> {
    let mut delay = initial_delay;
    let mut attempt = 1;

    loop {
        match notifier.notify(user, notice.clone()).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    user_id = %user.id,
                    notice = notice.kind(),
                    attempt,
                    "Email delivery failed, retrying in {:?}: {}",
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
