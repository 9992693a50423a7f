use crate::api::schemas::{ErrorResponse, MessageData, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::users::adapter::incoming::web::routes::account_action::send_confirmation_link;
use crate::modules::users::adapter::incoming::web::routes::dto::UserDetailDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::confirm_username_change::ChangeUsernameRequest;
use crate::modules::users::application::use_cases::AccountAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, put, web, Responder};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ChangeUsernameDto {
    #[schema(example = "johnny")]
    #[serde(default)]
    pub username: Option<String>,

    #[schema(example = "johnny")]
    #[serde(default)]
    pub re_username: Option<String>,
}

/// Request a username change
#[utoipa::path(
    get,
    path = "/api/users/change-username/request/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 202, description = "Confirmation email sent", body = inline(SuccessResponse<MessageData>)),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
        (status = 500, description = "Email could not be sent", body = ErrorResponse),
    )
)]
#[get("/api/users/change-username/request/")]
pub async fn request_username_change_handler(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    send_confirmation_link(
        &data,
        &auth.user,
        AccountAction::ChangeUsername,
        UserAction::ChangeUsernameRequest,
        "Username Change Request Sent Successfully",
    )
    .await
}

/// Confirm a username change
///
/// Stores the new username and deactivates the account until the emailed
/// reactivation link is followed.
#[utoipa::path(
    put,
    path = "/api/users/change-username/confirm/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Username change token from the email")),
    request_body = ChangeUsernameDto,
    responses(
        (status = 200, description = "Username changed, account awaiting reactivation", body = inline(SuccessResponse<UserDetailDto>)),
        (status = 400, description = "Invalid, mismatched or taken username", body = ErrorResponse),
        (status = 401, description = "Token invalid or superseded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[put("/api/users/change-username/confirm/{token}/")]
pub async fn confirm_username_change_handler(
    path: web::Path<String>,
    req: web::Json<ChangeUsernameDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();
    let request = ChangeUsernameRequest::new(dto.username, dto.re_username);

    let result = data
        .confirm_username_change_use_case
        .execute(&path.into_inner(), request)
        .await;
    data.metrics
        .record_user_action(UserAction::ChangeUsernameConfirm, result.is_ok());

    match result {
        Ok(user) => {
            info!(user_id = %user.id, "Username changed");
            ApiResponse::success(UserDetailDto::from(user))
        }
        Err(e) => flow_error_response(&e),
    }
}
