use crate::api::schemas::ErrorResponse;
use crate::modules::users::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, web, Responder};
use tracing::{error, info};

/// Logout
///
/// Revokes the caller's cached access and refresh tokens.
#[utoipa::path(
    get,
    path = "/api/users/logout/",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Missing or rejected access token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/logout/")]
pub async fn logout_user_handler(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = auth.user.id;
    let result = data.logout_user_use_case.execute(user_id).await;
    data.metrics
        .record_user_action(UserAction::Logout, result.is_ok());

    match result {
        Ok(()) => {
            info!(user_id = %user_id, "User logged out");
            ApiResponse::no_content()
        }
        Err(e) => {
            error!(user_id = %user_id, error = %e, "Logout failed");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::application::domain::entities::fixtures::active_user;
    use crate::modules::users::application::services::TokenLifecycleError;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::stubs::{StubAuthenticateUserUseCase, StubLogoutUserUseCase};
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_logout_revokes_caller_session() {
        let user = active_user();
        let logout = StubLogoutUserUseCase::default();
        let app_state = TestAppStateBuilder::default()
            .with_authenticate_user(StubAuthenticateUserUseCase::expecting(
                "access",
                Ok(user.clone()),
            ))
            .with_logout_user(logout.clone())
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(logout_user_handler)).await;

        let req = test::TestRequest::get()
            .uri("/api/users/logout/")
            .insert_header(("Authorization", "Bearer access"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 204);
        assert!(test::read_body(resp).await.is_empty());
        assert_eq!(logout.calls(), vec![user.id]);
    }

    #[actix_web::test]
    async fn test_logout_requires_credentials() {
        let logout = StubLogoutUserUseCase::default();
        let app_state = TestAppStateBuilder::default()
            .with_logout_user(logout.clone())
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(logout_user_handler)).await;

        let req = test::TestRequest::get().uri("/api/users/logout/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "MISSING_AUTH_HEADER");
        assert!(logout.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_logout_cache_failure() {
        let app_state = TestAppStateBuilder::default()
            .with_authenticate_user(StubAuthenticateUserUseCase::returning(Ok(active_user())))
            .with_logout_user(StubLogoutUserUseCase::failing(TokenLifecycleError::Cache(
                "connection refused".into(),
            )))
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(logout_user_handler)).await;

        let req = test::TestRequest::get()
            .uri("/api/users/logout/")
            .insert_header(("Authorization", "Bearer access"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 500);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    }
}
