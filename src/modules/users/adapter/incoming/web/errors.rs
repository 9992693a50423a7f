use actix_web::HttpResponse;
use tracing::{error, warn};

use crate::modules::users::application::use_cases::{AccountFlowError, OAuthError, SessionError};
use crate::shared::api::ApiResponse;

/// Maps a rejected session token (bearer access token or refresh token).
pub fn session_error_response(err: &SessionError) -> HttpResponse {
    let message = err.to_string();
    match err {
        SessionError::InvalidToken => ApiResponse::unauthorized("INVALID_TOKEN", &message),
        SessionError::TokenExpired => ApiResponse::unauthorized("TOKEN_EXPIRED", &message),
        SessionError::TokenRevoked => {
            warn!("Rejected revoked session token");
            ApiResponse::unauthorized("TOKEN_REVOKED", &message)
        }
        SessionError::UserNotFound => ApiResponse::unauthorized("USER_NOT_FOUND", &message),
        SessionError::UserDisabled => ApiResponse::unauthorized("USER_DISABLED", &message),
        SessionError::Internal(e) => {
            error!(error = %e, "Session check failed");
            ApiResponse::internal_error()
        }
    }
}

/// Maps the failure of an emailed-link flow.
pub fn flow_error_response(err: &AccountFlowError) -> HttpResponse {
    match err {
        AccountFlowError::InvalidToken(purpose) => {
            warn!(token_type = purpose.as_str(), "Rejected undecodable link token");
            ApiResponse::unauthorized("INVALID_TOKEN", &err.to_string())
        }
        AccountFlowError::TokenNotCurrent(purpose) => {
            warn!(token_type = purpose.as_str(), "Rejected stale link token");
            ApiResponse::unauthorized("TOKEN_NOT_CURRENT", &err.to_string())
        }
        AccountFlowError::UserNotFound => {
            ApiResponse::unauthorized("USER_NOT_FOUND", "User Not Found")
        }
        AccountFlowError::Validation(details) => ApiResponse::validation_error(details.clone()),
        AccountFlowError::NotificationFailed(e) => {
            error!(error = %e, "Email delivery failed");
            ApiResponse::internal_error()
        }
        AccountFlowError::QueryError(e) | AccountFlowError::RepositoryError(e) => {
            error!(error = %e, "Database operation failed");
            ApiResponse::internal_error()
        }
        AccountFlowError::HashingFailed(e) => {
            error!(error = %e, "Password hashing failed");
            ApiResponse::internal_error()
        }
        AccountFlowError::TokenError(e) => {
            error!(error = %e, "Token cache or signing failed");
            ApiResponse::internal_error()
        }
    }
}

/// Maps a failed social login or callback.
pub fn oauth_error_response(err: &OAuthError) -> HttpResponse {
    let message = err.to_string();
    match err {
        OAuthError::UnknownBackend => ApiResponse::bad_request("INVALID_BACKEND", &message),
        OAuthError::AuthenticationFailed => {
            ApiResponse::bad_request("AUTHENTICATION_FAILED", &message)
        }
        OAuthError::EmailInUse => ApiResponse::bad_request("EMAIL_EXISTS", &message),
        OAuthError::UserInactive => ApiResponse::unauthorized("USER_INACTIVE", &message),
        OAuthError::ProviderError(e) => {
            error!(error = %e, "OAuth provider request failed");
            ApiResponse::internal_error()
        }
        OAuthError::StateStoreError(e) | OAuthError::TokenGenerationFailed(e) => {
            error!(error = %e, "Token cache or signing failed");
            ApiResponse::internal_error()
        }
        OAuthError::QueryError(e) | OAuthError::RepositoryError(e) => {
            error!(error = %e, "Database operation failed");
            ApiResponse::internal_error()
        }
        OAuthError::HashingFailed(e) => {
            error!(error = %e, "Password hashing failed");
            ApiResponse::internal_error()
        }
    }
}
