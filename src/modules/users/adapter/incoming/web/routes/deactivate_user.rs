use crate::api::schemas::{ErrorResponse, MessageData, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::users::adapter::incoming::web::routes::account_action::send_confirmation_link;
use crate::modules::users::adapter::incoming::web::routes::dto::UserDetailDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::AccountAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, web, Responder};
use tracing::info;

/// Request account deactivation
///
/// Emails a confirmation link, reusing one that is still outstanding.
#[utoipa::path(
    get,
    path = "/api/users/deactivate/request/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 202, description = "Confirmation email sent", body = inline(SuccessResponse<MessageData>)),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse),
    )
)]
#[get("/api/users/deactivate/request/")]
pub async fn request_deactivation_handler(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    send_confirmation_link(
        &data,
        &auth.user,
        AccountAction::Deactivation,
        UserAction::DeactivateRequest,
        "Deactivation Request Sent Successfully",
    )
    .await
}

/// Confirm account deactivation
#[utoipa::path(
    get,
    path = "/api/users/deactivate/confirm/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Deactivation token from the email")),
    responses(
        (status = 200, description = "Account deactivated", body = inline(SuccessResponse<UserDetailDto>)),
        (status = 401, description = "Token invalid or superseded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/deactivate/confirm/{token}/")]
pub async fn confirm_deactivation_handler(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let result = data
        .confirm_deactivation_use_case
        .execute(&path.into_inner())
        .await;
    data.metrics
        .record_user_action(UserAction::DeactivateConfirm, result.is_ok());

    match result {
        Ok(user) => {
            info!(user_id = %user.id, "Account deactivated");
            ApiResponse::success(UserDetailDto::from(user))
        }
        Err(e) => flow_error_response(&e),
    }
}
