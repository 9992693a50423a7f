use crate::api::schemas::{ErrorResponse, MessageData, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::users::adapter::incoming::web::routes::account_action::send_confirmation_link;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::AccountAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, web, Responder};
use tracing::info;

/// Request account deletion
#[utoipa::path(
    get,
    path = "/api/users/delete/request/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 202, description = "Confirmation email sent", body = inline(SuccessResponse<MessageData>)),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse),
    )
)]
#[get("/api/users/delete/request/")]
pub async fn request_deletion_handler(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    send_confirmation_link(
        &data,
        &auth.user,
        AccountAction::Deletion,
        UserAction::DeleteRequest,
        "Deletion Request Sent Successfully",
    )
    .await
}

/// Confirm account deletion
///
/// Permanently removes the account the link was issued to.
#[utoipa::path(
    get,
    path = "/api/users/delete/confirm/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Deletion token from the email")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Token invalid or superseded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/delete/confirm/{token}/")]
pub async fn confirm_deletion_handler(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let result = data
        .confirm_deletion_use_case
        .execute(&path.into_inner())
        .await;
    data.metrics
        .record_user_action(UserAction::DeleteConfirm, result.is_ok());

    match result {
        Ok(()) => {
            info!("Account deleted");
            ApiResponse::no_content()
        }
        Err(e) => flow_error_response(&e),
    }
}
