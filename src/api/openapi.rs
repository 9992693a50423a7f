use crate::api::schemas::{ErrorDetail, ErrorResponse, MessageData, SuccessResponse};
use crate::health::{
    DiskInfo, HealthReport, HealthStatus, MemoryInfo, ReadinessResponse, SystemInfo,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::modules::users::adapter::incoming::web::routes::dto::{
    IdentifierDto, SessionDto, UserDetailDto,
};
use crate::modules::users::adapter::incoming::web::routes::{
    ChangeEmailDto, ChangeUsernameDto, LoginRequestDto, NewPasswordDto, OAuthUrlDto,
    ReLoginRequestDto, RegisterUserDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Accounts API",
        version = "1.0.0",
        description = "Registration, sessions and emailed account actions",
    ),
    paths(
        // Health
        crate::health::health,
        crate::health::readiness,

        // Sessions
        crate::modules::users::adapter::incoming::web::routes::register_user_handler,
        crate::modules::users::adapter::incoming::web::routes::activate_user_handler,
        crate::modules::users::adapter::incoming::web::routes::login_user_handler,
        crate::modules::users::adapter::incoming::web::routes::re_login_handler,
        crate::modules::users::adapter::incoming::web::routes::logout_user_handler,
        crate::modules::users::adapter::incoming::web::routes::fetch_me_handler,

        // Account actions
        crate::modules::users::adapter::incoming::web::routes::request_deactivation_handler,
        crate::modules::users::adapter::incoming::web::routes::confirm_deactivation_handler,
        crate::modules::users::adapter::incoming::web::routes::request_deletion_handler,
        crate::modules::users::adapter::incoming::web::routes::confirm_deletion_handler,
        crate::modules::users::adapter::incoming::web::routes::request_email_change_handler,
        crate::modules::users::adapter::incoming::web::routes::confirm_email_change_handler,
        crate::modules::users::adapter::incoming::web::routes::request_username_change_handler,
        crate::modules::users::adapter::incoming::web::routes::confirm_username_change_handler,
        crate::modules::users::adapter::incoming::web::routes::request_reactivation_handler,
        crate::modules::users::adapter::incoming::web::routes::confirm_reactivation_handler,
        crate::modules::users::adapter::incoming::web::routes::request_password_reset_handler,
        crate::modules::users::adapter::incoming::web::routes::confirm_password_reset_handler,

        // Social login
        crate::modules::users::adapter::incoming::web::routes::oauth_login_handler,
        crate::modules::users::adapter::incoming::web::routes::oauth_callback_handler,
    ),
    components(
        schemas(
            // Response wrappers
            SuccessResponse<UserDetailDto>,
            SuccessResponse<SessionDto>,
            SuccessResponse<MessageData>,
            SuccessResponse<OAuthUrlDto>,
            ErrorResponse,
            ErrorDetail,
            MessageData,

            // User DTOs
            UserDetailDto,
            SessionDto,
            RegisterUserDto,
            LoginRequestDto,
            ReLoginRequestDto,
            ChangeEmailDto,
            ChangeUsernameDto,
            IdentifierDto,
            NewPasswordDto,
            OAuthUrlDto,

            // Health
            HealthReport,
            HealthStatus,
            SystemInfo,
            MemoryInfo,
            DiskInfo,
            ReadinessResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Account lifecycle endpoints"),
        (name = "oauth", description = "Google and GitHub sign-in"),
        (name = "health", description = "Liveness and readiness checks"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from login or re-login"))
                        .build(),
                ),
            )
        }
    }
}
