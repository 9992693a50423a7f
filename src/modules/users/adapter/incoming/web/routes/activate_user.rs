use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::users::adapter::incoming::web::errors::flow_error_response;
use crate::modules::users::adapter::incoming::web::routes::dto::UserDetailDto;
use crate::modules::users::application::ports::outgoing::UserAction;
use crate::shared::api::ApiResponse;
use crate::AppState;
use actix_web::{get, web, Responder};
use tracing::info;

/// Activate an account
///
/// Target of the link emailed after registration or an email change.
#[utoipa::path(
    get,
    path = "/api/users/activate/{token}/",
    tag = "users",
    params(("token" = String, Path, description = "Activation token from the email")),
    responses(
        (status = 200, description = "Account activated", body = inline(SuccessResponse<UserDetailDto>)),
        (
            status = 401,
            description = "Token invalid or superseded",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": { "code": "TOKEN_NOT_CURRENT", "message": "Invalid Or Expired Activation Token" }
            })
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[get("/api/users/activate/{token}/")]
pub async fn activate_user_handler(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let token = path.into_inner();
    let result = data.activate_user_use_case.execute(&token).await;
    data.metrics
        .record_user_action(UserAction::Activate, result.is_ok());

    match result {
        Ok(user) => {
            info!(user_id = %user.id, "Account activated");
            ApiResponse::success(UserDetailDto::from(user))
        }
        Err(e) => flow_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::application::domain::entities::fixtures::active_user;
    use crate::modules::users::application::domain::TokenPurpose;
    use crate::modules::users::application::use_cases::AccountFlowError;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::stubs::StubUserLinkUseCase;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_activate_passes_path_token() {
        let stub = StubUserLinkUseCase::returning(Ok(active_user()));
        let app_state = TestAppStateBuilder::default()
            .with_activate_user(stub.clone())
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(activate_user_handler))
                .await;

        let req = test::TestRequest::get()
            .uri("/api/users/activate/abc.def.ghi/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["is_active"], true);
        assert_eq!(stub.received_tokens(), vec!["abc.def.ghi".to_string()]);
    }

    #[actix_web::test]
    async fn test_activate_with_stale_token() {
        let stub = StubUserLinkUseCase::returning(Err(AccountFlowError::TokenNotCurrent(
            TokenPurpose::Activation,
        )));
        let app_state = TestAppStateBuilder::default()
            .with_activate_user(stub)
            .build();
        let app =
            test::init_service(App::new().app_data(app_state).service(activate_user_handler))
                .await;

        let req = test::TestRequest::get()
            .uri("/api/users/activate/old-token/")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "TOKEN_NOT_CURRENT");
        assert_eq!(
            body["error"]["message"],
            "Invalid Or Expired Activation Token"
        );
    }
}
