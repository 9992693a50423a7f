use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::users::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::users::adapter::incoming::web::routes::dto::UserDetailDto;
use crate::shared::api::ApiResponse;
use actix_web::{get, Responder};

/// Current user
#[utoipa::path(
    get,
    path = "/api/users/me/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated account", body = inline(SuccessResponse<UserDetailDto>)),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
    )
)]
#[get("/api/users/me/")]
pub async fn fetch_me_handler(auth: AuthenticatedUser) -> impl Responder {
    ApiResponse::success(UserDetailDto::from(auth.user))
}
