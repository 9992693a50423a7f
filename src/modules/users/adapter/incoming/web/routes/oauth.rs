use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::oauth_error_response;
use crate::modules::users::adapter::incoming::web::routes::dto::SessionDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::modules::users::application::use_cases::OAuthCallbackParams;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

/// Where the client sends the user to sign in with the provider
#[derive(Debug, Serialize, ToSchema)]
pub struct OAuthUrlDto {
    #[schema(example = "https://github.com/login/oauth/authorize?response_type=code&client_id=...")]
    pub auth_url: String,
}

/// Query string appended by the provider on redirect
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OAuthCallbackQuery {
    /// Authorization code to exchange
    #[serde(default)]
    pub code: Option<String>,

    /// Value handed out by the login endpoint
    #[serde(default)]
    pub state: Option<String>,

    /// Present when the user denied access
    #[serde(default)]
    pub error: Option<String>,
}

impl From<OAuthCallbackQuery> for OAuthCallbackParams {
    fn from(query: OAuthCallbackQuery) -> Self {
        Self {
            code: query.code,
            state: query.state,
            error: query.error,
        }
    }
}

/// Start a social login
///
/// Returns the provider authorization URL. Supported backends are
/// `google-oauth2` and `github` when their credentials are configured.
#[utoipa::path(
    get,
    path = "/api/users/oauth/{backend_name}/login/",
    tag = "oauth",
    params(("backend_name" = String, Path, description = "`google-oauth2` or `github`")),
    responses(
        (status = 200, description = "Authorization URL issued", body = inline(SuccessResponse<OAuthUrlDto>)),
        (
            status = 400,
            description = "Unknown or unconfigured backend",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "INVALID_BACKEND", "message": "Unsupported OAuth Backend" }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/oauth/{backend_name}/login/")]
pub async fn oauth_login_handler(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let backend_name = path.into_inner();
    let result = data.oauth_login_use_case.execute(&backend_name).await;
    data.metrics
        .record_user_action(UserAction::OAuthLogin, result.is_ok());

    match result {
        Ok(auth_url) => ApiResponse::success(OAuthUrlDto { auth_url }),
        Err(e) => oauth_error_response(&e),
    }
}

/// Finish a social login
///
/// Redirect target registered with the provider. Links or creates the
/// account and answers with the same session as a password login.
#[utoipa::path(
    get,
    path = "/api/users/oauth/{backend_name}/callback/",
    tag = "oauth",
    params(
        ("backend_name" = String, Path, description = "`google-oauth2` or `github`"),
        OAuthCallbackQuery
    ),
    responses(
        (status = 200, description = "Login successful", body = inline(SuccessResponse<SessionDto>)),
        (
            status = 400,
            description = "Unknown backend, failed handshake or email owned by a password account",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "AUTHENTICATION_FAILED", "message": "Authentication Failed" }
            })
        ),
        (status = 401, description = "Account is not active", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/oauth/{backend_name}/callback/")]
pub async fn oauth_callback_handler(
    path: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let backend_name = path.into_inner();
    let result = data
        .oauth_callback_use_case
        .execute(&backend_name, query.into_inner().into())
        .await;
    data.metrics
        .record_user_action(UserAction::OAuthCallback, result.is_ok());

    match result {
        Ok(session) => {
            info!(user_id = %session.user.id, backend = %backend_name, "Social login succeeded");
            ApiResponse::success(SessionDto::from(session))
        }
        Err(e) => oauth_error_response(&e),
    }
}
