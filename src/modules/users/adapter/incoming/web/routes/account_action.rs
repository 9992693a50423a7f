use actix_web::HttpResponse;
use tracing::info;

use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::application::domain::User;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::AccountAction;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Emails the caller the confirmation link for `action` and answers 202.
pub(super) async fn send_confirmation_link(
    data: &AppState,
    user: &User,
    action: AccountAction,
    metric: UserAction,
    message: &str,
) -> HttpResponse {
    let result = data
        .request_account_action_use_case
        .execute(user, action)
        .await;
    data.metrics.record_user_action(metric, result.is_ok());

    match result {
        Ok(()) => {
            info!(user_id = %user.id, action = ?action, "Confirmation link sent");
            ApiResponse::accepted_message(message)
        }
        Err(e) => flow_error_response(&e),
    }
}
