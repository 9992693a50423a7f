use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::routes::dto::UserDetailDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::register_user::RegisterUserRequest;
use crate::modules::users::application::use_cases::AccountFlowError;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;

/// Request body for user registration
#[derive(Deserialize, ToSchema)]
pub struct RegisterUserDto {
    /// Alphanumeric, up to 60 characters
    #[schema(example = "johndoe")]
    #[serde(default)]
    pub username: Option<String>,

    #[schema(example = "john@example.com")]
    #[serde(default)]
    pub email: Option<String>,

    #[schema(example = "John")]
    #[serde(default)]
    pub first_name: Option<String>,

    #[schema(example = "Doe")]
    #[serde(default)]
    pub last_name: Option<String>,

    #[schema(example = "SecurePass123!")]
    #[serde(default)]
    pub password: Option<String>,

    /// Must repeat `password`
    #[schema(example = "SecurePass123!")]
    #[serde(default)]
    pub re_password: Option<String>,
}

/// Register a new account
///
/// Creates an inactive account and emails an activation link.
#[utoipa::path(
    post,
    path = "/api/users/register/",
    tag = "users",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "Account created, activation email queued", body = inline(SuccessResponse<UserDetailDto>)),
        (
            status = 400,
            description = "Invalid or duplicate fields",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Invalid input",
                    "details": { "email": ["Email Already Exists"] }
                }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/users/register/")]
pub async fn register_user_handler(
    req: web::Json<RegisterUserDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();

    let request = match RegisterUserRequest::new(
        dto.username,
        dto.email,
        dto.first_name,
        dto.last_name,
        dto.password,
        dto.re_password,
    ) {
        Ok(request) => request,
        Err(details) => {
            data.metrics.record_user_action(UserAction::Register, false);
            return ApiResponse::validation_error(details);
        }
    };

    let result = data.register_user_use_case.execute(request).await;
    data.metrics
        .record_user_action(UserAction::Register, result.is_ok());

    match result {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "User registered");
            ApiResponse::created(UserDetailDto::from(user))
        }
        Err(AccountFlowError::Validation(details)) => {
            warn!(fields = %details, "Registration rejected");
            ApiResponse::validation_error(details)
        }
        Err(e) => flow_error_response(&e),
    }
}
