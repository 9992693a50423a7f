use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;

use crate::modules::users::adapter::incoming::web::errors::session_error_response;
use crate::modules::users::application::domain::User;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// The active account behind a `Bearer` access token that is still the cached one.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = extract_token_from_header(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| create_api_error(ApiResponse::internal_error()))?;
            let token = token.map_err(create_api_error)?;

            state
                .authenticate_user_use_case
                .execute(&token)
                .await
                .map(|user| AuthenticatedUser { user })
                .map_err(|e| create_api_error(session_error_response(&e)))
        })
    }
}

/// Accepts `Bearer <token>` with the scheme in any casing. A header with a
/// different scheme counts as no credentials at all.
fn extract_token_from_header(req: &HttpRequest) -> Result<String, HttpResponse> {
    let missing = || {
        ApiResponse::unauthorized(
            "MISSING_AUTH_HEADER",
            "Authentication Credentials Were Not Provided",
        )
    };
    let invalid =
        || ApiResponse::unauthorized("INVALID_AUTH_HEADER", "Invalid Authorization Header");

    let header = req.headers().get("Authorization").ok_or_else(missing)?;
    let value = header.to_str().map_err(|_| invalid())?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(missing()),
        [_, token] => Ok((*token).to_string()),
        [] => Err(missing()),
        _ => Err(invalid()),
    }
}
