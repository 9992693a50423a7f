use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::users::adapter::incoming::web::routes::dto::SessionDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::login_user::{LoginError, LoginRequest};
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{post, web, Responder};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Login request from client
#[derive(Deserialize, ToSchema)]
pub struct LoginRequestDto {
    /// Username or email, case-insensitive
    #[schema(example = "johndoe")]
    #[serde(default)]
    pub identifier: Option<String>,

    #[schema(example = "SecurePass123!")]
    #[serde(default)]
    pub password: Option<String>,
}

/// User login
///
/// Authenticates with username or email and password. Outstanding session
/// tokens are handed back when they are still valid.
#[utoipa::path(
    post,
    path = "/api/users/login/",
    tag = "users",
    request_body = LoginRequestDto,
    responses(
        (
            status = 200,
            description = "Login successful",
            body = inline(SuccessResponse<SessionDto>)
        ),
        (status = 400, description = "Missing identifier or password", body = ErrorResponse),
        (
            status = 401,
            description = "Invalid credentials, inactive account or social account",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "INVALID_CREDENTIALS",
                    "message": "Invalid Username Or Password"
                }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/users/login/")]
pub async fn login_user_handler(
    req: web::Json<LoginRequestDto>,
    data: web::Data<AppState>,
) -> impl Responder {
    let dto = req.into_inner();

    let request = match LoginRequest::new(dto.identifier, dto.password) {
        Ok(request) => request,
        Err(details) => {
            data.metrics.record_user_action(UserAction::Login, false);
            return ApiResponse::validation_error(details);
        }
    };

    info!(identifier = %request.identifier(), "Login attempt");

    let result = data.login_user_use_case.execute(request).await;
    data.metrics
        .record_user_action(UserAction::Login, result.is_ok());

    match result {
        Ok(session) => {
            info!(user_id = %session.user.id, "User logged in successfully");
            ApiResponse::success(SessionDto::from(session))
        }

        Err(LoginError::InvalidCredentials) => {
            warn!("Login failed: Invalid credentials");
            ApiResponse::unauthorized("INVALID_CREDENTIALS", "Invalid Username Or Password")
        }

        Err(LoginError::UserInactive) => {
            warn!("Login failed: User inactive");
            ApiResponse::unauthorized("USER_INACTIVE", "User Is Not Active")
        }

        Err(LoginError::SocialAccount) => {
            warn!("Login failed: Account uses social sign-in");
            ApiResponse::unauthorized("SOCIAL_ACCOUNT", "User Registered With Social Auth")
        }

        Err(LoginError::PasswordVerificationFailed(ref e)) => {
            error!(error = %e, "Password verification failed");
            ApiResponse::internal_error()
        }

        Err(LoginError::TokenGenerationFailed(ref e)) => {
            error!(error = %e, "Token generation failed");
            ApiResponse::internal_error()
        }

        Err(LoginError::QueryError(ref e)) | Err(LoginError::RepositoryError(ref e)) => {
            error!(error = %e, "Database operation failed");
            ApiResponse::internal_error()
        }
    }
}
