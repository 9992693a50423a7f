use crate::api::schemas::{ErrorResponse, MessageData, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::users::adapter::incoming::web::routes::account_action::send_confirmation_link;
use crate::modules::users::adapter::incoming::web::routes::dto::UserDetailDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::confirm_email_change::ChangeEmailRequest;
use crate::modules::users::application::use_cases::AccountAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, put, web, Responder};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ChangeEmailDto {
    #[schema(example = "john.new@example.com")]
    #[serde(default)]
    pub email: Option<String>,

    #[schema(example = "john.new@example.com")]
    #[serde(default)]
    pub re_email: Option<String>,
}

/// Request an email change
#[utoipa::path(
    get,
    path = "/api/users/change-email/request/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 202, description = "Confirmation email sent", body = inline(SuccessResponse<MessageData>)),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse),
    )
)]
#[get("/api/users/change-email/request/")]
pub async fn request_email_change_handler(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    send_confirmation_link(
        &data,
        &auth.user,
        AccountAction::ChangeEmail,
        UserAction::ChangeEmailRequest,
        "Email Change Request Sent Successfully",
    )
    .await
}

/// Confirm an email change
///
/// Stores the new address and deactivates the account until the activation
/// link sent to the new address is followed.
#[utoipa::path(
    put,
    path = "/api/users/change-email/confirm/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Email change token from the email")),
    request_body = ChangeEmailDto,
    responses(
        (status = 200, description = "Email changed, account awaiting re-activation", body = inline(SuccessResponse<UserDetailDto>)),
        (status = 400, description = "Invalid, mismatched or taken email", body = ErrorResponse),
        (status = 401, description = "Token invalid or superseded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[put("/api/users/change-email/confirm/{token}/")]
pub async fn confirm_email_change_handler(
    path: web::Path<String>,
    req: web::Json<ChangeEmailDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let request = ChangeEmailRequest::new(dto.email, dto.re_email);

    let result = data
        .confirm_email_change_use_case
        .execute(&path.into_inner(), request)
        .await;
    data.metrics
        .record_user_action(UserAction::ChangeEmailConfirm, result.is_ok());

    match result {
        Ok(user) => {
            info!(user_id = %user.id, "Email changed");
            ApiResponse::success(UserDetailDto::from(user))
        }
        Err(e) => flow_error_response(&e),
    }
}
