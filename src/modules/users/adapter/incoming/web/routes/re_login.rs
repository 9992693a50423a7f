use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::session_error_response;
use crate::modules::users::adapter::incoming::web::routes::dto::SessionDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ReLoginRequestDto {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    #[serde(default)]
    pub refresh_token: String,
}

/// Re-login with a refresh token
///
/// Issues a new access token. The refresh token is returned unchanged.
#[utoipa::path(
    post,
    path = "/api/users/re-login/",
    tag = "users",
    request_body = ReLoginRequestDto,
    responses(
        (status = 200, description = "New access token issued", body = inline(SuccessResponse<SessionDto>)),
        (
            status = 401,
            description = "Refresh token rejected",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "TOKEN_REVOKED", "message": "Token Has Been Revoked" }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/users/re-login/")]
pub async fn re_login_handler(
    req: web::Json<ReLoginRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let result = data.re_login_use_case.execute(&req.refresh_token).await;
    data.metrics
        .record_user_action(UserAction::ReLogin, result.is_ok());

    match result {
        Ok(session) => {
            info!(user_id = %session.user.id, "Access token renewed");
            ApiResponse::success(SessionDto::from(session))
        }
        Err(e) => {
            warn!(reason = %e, "Re-login rejected");
            session_error_response(&e)
        }
    }
}
