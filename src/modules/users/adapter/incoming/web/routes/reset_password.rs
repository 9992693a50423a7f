use crate::api::schemas::{ErrorResponse, MessageData, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::routes::dto::IdentifierDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::confirm_password_reset::NewPasswordRequest;
use crate::modules::users::application::use_cases::IdentifierRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct NewPasswordDto {
    #[schema(example = "NewSecure123!")]
    #[serde(default)]
    pub password: Option<String>,

    #[schema(example = "NewSecure123!")]
    #[serde(default)]
    pub re_password: Option<String>,
}

/// Request a password reset link
#[utoipa::path(
    post,
    path = "/api/users/reset-password/request/",
    tag = "users",
    request_body = IdentifierDto,
    responses(
        (status = 202, description = "Reset email sent", body = inline(SuccessResponse<MessageData>)),
        (status = 400, description = "Unknown or mismatched identifier", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse),
    )
)]
#[post("/api/users/reset-password/request/")]
pub async fn request_password_reset_handler(
    req: web::Json<IdentifierDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let request = match IdentifierRequest::new(dto.identifier, dto.re_identifier) {
        Ok(request) => request,
        Err(details) => {
            data.metrics
                .record_user_action(UserAction::ResetPasswordRequest, false);
            return ApiResponse::validation_error(details);
        }
    };

    let result = data.request_password_reset_use_case.execute(request).await;
    data.metrics
        .record_user_action(UserAction::ResetPasswordRequest, result.is_ok());

    match result {
        Ok(()) => ApiResponse::accepted_message("Password Reset Request Sent Successfully"),
        Err(e) => flow_error_response(&e),
    }
}

/// Set a new password from a reset link
///
/// The token is checked before the passwords. All sessions end on success.
#[utoipa::path(
    post,
    path = "/api/users/reset-password/confirm/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Password reset token from the email")),
    request_body = NewPasswordDto,
    responses(
        (status = 200, description = "Password changed", body = inline(SuccessResponse<MessageData>)),
        (status = 400, description = "Password rejected", body = ErrorResponse),
        (status = 401, description = "Token invalid or superseded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/users/reset-password/confirm/{token}/")]
pub async fn confirm_password_reset_handler(
    path: web::Path<String>,
    req: web::Json<NewPasswordDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let request = NewPasswordRequest::new(dto.password, dto.re_password);

    let result = data
        .confirm_password_reset_use_case
        .execute(&path.into_inner(), request)
        .await;
    data.metrics
        .record_user_action(UserAction::ResetPasswordConfirm, result.is_ok());

    match result {
        Ok(()) => ApiResponse::message("Password Reset Completed Successfully"),
        Err(e) => flow_error_response(&e),
    }
}
