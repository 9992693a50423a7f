use crate::api::schemas::{ErrorResponse, MessageData, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::routes::dto::{IdentifierDto, UserDetailDto};
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::IdentifierRequest;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, post, web, Responder};
use tracing::info;

/// Request reactivation of a deactivated account
#[utoipa::path(
    post,
    path = "/api/users/reactivate/request/",
    tag = "users",
    request_body = IdentifierDto,
    responses(
        (status = 202, description = "Reactivation email sent", body = inline(SuccessResponse<MessageData>)),
        (
            status = 400,
            description = "Unknown identifier or account already active",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Invalid input",
                    "details": { "identifier": ["Account Is Already Active"] }
                }
            })
        ),
        (status = 500, description = "Email could not be sent", body = ErrorResponse),
    )
)]
#[post("/api/users/reactivate/request/")]
pub async fn request_reactivation_handler(
    req: web::Json<IdentifierDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let request = match IdentifierRequest::new(dto.identifier, dto.re_identifier) {
        Ok(request) => request,
        Err(details) => {
            data.metrics
                .record_user_action(UserAction::ReactivateRequest, false);
            return ApiResponse::validation_error(details);
        }
    };

    let result = data.request_reactivation_use_case.execute(request).await;
    data.metrics
        .record_user_action(UserAction::ReactivateRequest, result.is_ok());

    match result {
        Ok(()) => ApiResponse::accepted_message("Reactivation Request Sent Successfully"),
        Err(e) => flow_error_response(&e),
    }
}

/// Confirm reactivation
#[utoipa::path(
    get,
    path = "/api/users/reactivate/confirm/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Reactivation token from the email")),
    responses(
        (status = 200, description = "Account reactivated", body = inline(SuccessResponse<UserDetailDto>)),
        (status = 401, description = "Token invalid or superseded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/reactivate/confirm/{token}/")]
pub async fn confirm_reactivation_handler(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let result = data
        .confirm_reactivation_use_case
        .execute(&path.into_inner())
        .await;
    data.metrics
        .record_user_action(UserAction::ReactivateConfirm, result.is_ok());

    match result {
        Ok(user) => {
            info!(user_id = %user.id, "Account reactivated");
            ApiResponse::success(UserDetailDto::from(user))
        }
        Err(e) => flow_error_response(&e),
    }
}
