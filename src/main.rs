mod api;
pub mod health;
pub mod modules;
mod shared;

use crate::api::openapi::ApiDoc;
use crate::health::HealthState;
use crate::modules::email::adapter::outgoing::SmtpEmailSender;
use crate::modules::email::application::ports::outgoing::{AccountNotifier, EmailSender};
use crate::modules::email::application::services::AccountEmailService;
use crate::modules::users::adapter::incoming::scheduler::unactivated_user_purge::{
    unactivated_user_purge_worker, DEFAULT_PURGE_INTERVAL_SECS,
};
use crate::modules::users::adapter::incoming::web::routes::init_routes;
use crate::modules::users::adapter::outgoing::token_cache_redis::DEFAULT_KEY_PREFIX;
use crate::modules::users::adapter::outgoing::{
    Argon2Hasher, JwtConfig, JwtTokenService, OAuth2Provider, OAuthConfig,
    PrometheusAccountMetrics, RedisTokenCache, SocialAccountPostgres, UserQueryPostgres,
    UserRepositoryPostgres,
};
use crate::modules::users::application::ports::outgoing::{
    AccountMetrics, OAuthProvider, OAuthStateStore, PasswordHasher, SocialAccountStore,
    UserQuery, UserRepository,
};
use crate::modules::users::application::services::TokenLifecycle;
use crate::modules::users::application::use_cases::{
    activate_user::{ActivateUserUseCase, IActivateUserUseCase},
    authenticate_user::{AuthenticateUserUseCase, IAuthenticateUserUseCase},
    confirm_deactivation::{ConfirmDeactivationUseCase, IConfirmDeactivationUseCase},
    confirm_deletion::{ConfirmDeletionUseCase, IConfirmDeletionUseCase},
    confirm_email_change::{ConfirmEmailChangeUseCase, IConfirmEmailChangeUseCase},
    confirm_password_reset::{ConfirmPasswordResetUseCase, IConfirmPasswordResetUseCase},
    confirm_reactivation::{ConfirmReactivationUseCase, IConfirmReactivationUseCase},
    confirm_username_change::{ConfirmUsernameChangeUseCase, IConfirmUsernameChangeUseCase},
    login_user::{ILoginUserUseCase, LoginUserUseCase},
    logout_user::{ILogoutUserUseCase, LogoutUserUseCase},
    oauth_callback::{IOAuthCallbackUseCase, OAuthCallbackUseCase},
    oauth_login::{IOAuthLoginUseCase, OAuthLoginUseCase},
    purge_unactivated_users::{
        IPurgeUnactivatedUsersUseCase, PurgeUnactivatedUsersUseCase,
        DEFAULT_UNACTIVATED_TTL_MINUTES,
    },
    re_login::{IReLoginUseCase, ReLoginUseCase},
    register_user::{IRegisterUserUseCase, RegisterUserUseCase},
    request_account_action::{IRequestAccountActionUseCase, RequestAccountActionUseCase},
    request_password_reset::{IRequestPasswordResetUseCase, RequestPasswordResetUseCase},
    request_reactivation::{IRequestReactivationUseCase, RequestReactivationUseCase},
};
use crate::shared::api::custom_json_config;
use crate::shared::config::{self, ProjectSettings};

use actix_web::{web, App, HttpServer};
use actix_web_prom::PrometheusMetricsBuilder;
use deadpool_redis::{Config, Runtime};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub register_user_use_case: Arc<dyn IRegisterUserUseCase + Send + Sync>,
    pub activate_user_use_case: Arc<dyn IActivateUserUseCase + Send + Sync>,
    pub login_user_use_case: Arc<dyn ILoginUserUseCase + Send + Sync>,
    pub re_login_use_case: Arc<dyn IReLoginUseCase + Send + Sync>,
    pub logout_user_use_case: Arc<dyn ILogoutUserUseCase + Send + Sync>,
    pub authenticate_user_use_case: Arc<dyn IAuthenticateUserUseCase + Send + Sync>,
    pub request_account_action_use_case: Arc<dyn IRequestAccountActionUseCase + Send + Sync>,
    pub confirm_deactivation_use_case: Arc<dyn IConfirmDeactivationUseCase + Send + Sync>,
    pub confirm_deletion_use_case: Arc<dyn IConfirmDeletionUseCase + Send + Sync>,
    pub confirm_email_change_use_case: Arc<dyn IConfirmEmailChangeUseCase + Send + Sync>,
    pub confirm_username_change_use_case: Arc<dyn IConfirmUsernameChangeUseCase + Send + Sync>,
    pub request_reactivation_use_case: Arc<dyn IRequestReactivationUseCase + Send + Sync>,
    pub confirm_reactivation_use_case: Arc<dyn IConfirmReactivationUseCase + Send + Sync>,
    pub request_password_reset_use_case: Arc<dyn IRequestPasswordResetUseCase + Send + Sync>,
    pub confirm_password_reset_use_case: Arc<dyn IConfirmPasswordResetUseCase + Send + Sync>,
    pub oauth_login_use_case: Arc<dyn IOAuthLoginUseCase + Send + Sync>,
    pub oauth_callback_use_case: Arc<dyn IOAuthCallbackUseCase + Send + Sync>,
    pub metrics: Arc<dyn AccountMetrics>,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Redis TLS connections need a process-wide crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    let environment = config::load_env_files();

    let host = config::required("HOST")?;
    let port = config::required("PORT")?;
    let db_url = config::required("DATABASE_URL")?;
    let redis_url = config::required("REDIS_URL")?;
    let settings = ProjectSettings::from_env(&environment, &host, &port);

    let server_url = format!("{host}:{port}");
    info!(
        app = %settings.name,
        version = %settings.version,
        environment = %settings.environment,
        "Server will listen on {}", server_url
    );

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt).await.map_err(io::Error::other)?;

    if config::flag("RUN_MIGRATIONS") {
        Migrator::up(&conn, None).await.map_err(io::Error::other)?;
        info!("Database migrations applied");
    }

    let db_arc = Arc::new(conn);

    // Redis connection
    let redis_pool = Config::from_url(&redis_url)
        .create_pool(Some(Runtime::Tokio1))
        .map_err(io::Error::other)?;
    let redis_arc = Arc::new(redis_pool);

    // Metrics: account counters share the registry served by the middleware
    let registry = prometheus::Registry::new();
    let metrics_namespace = settings.slug().replace('-', "_");
    let account_metrics: Arc<dyn AccountMetrics> = Arc::new(
        PrometheusAccountMetrics::new(&registry, &metrics_namespace).map_err(io::Error::other)?,
    );
    let prometheus = PrometheusMetricsBuilder::new(&metrics_namespace)
        .registry(registry)
        .endpoint("/metrics")
        .build()
        .map_err(|e| io::Error::other(e.to_string()))?;

    // Outgoing adapters
    let token_provider = Arc::new(JwtTokenService::new(JwtConfig::from_env(settings.slug())?));
    let token_cache = Arc::new(RedisTokenCache::new(
        Arc::clone(&redis_arc),
        config::optional("TOKEN_CACHE_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
    ));
    let oauth_states: Arc<dyn OAuthStateStore> = token_cache.clone();
    let tokens = TokenLifecycle::new(token_provider, token_cache, Arc::clone(&account_metrics));

    let user_query: Arc<dyn UserQuery> = Arc::new(UserQueryPostgres::new(Arc::clone(&db_arc)));
    let user_repo: Arc<dyn UserRepository> =
        Arc::new(UserRepositoryPostgres::new(Arc::clone(&db_arc)));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::from_env()?);
    let social_accounts: Arc<dyn SocialAccountStore> =
        Arc::new(SocialAccountPostgres::new(Arc::clone(&db_arc)));

    let oauth_config = OAuthConfig::from_env(settings.public_base_url.clone())?;
    let oauth_provider: Arc<dyn OAuthProvider> = Arc::new(OAuth2Provider::new(&oauth_config)?);

    let email_sender: Arc<dyn EmailSender> = Arc::new(SmtpEmailSender::from_env(&environment)?);
    let notifier: Arc<dyn AccountNotifier> = Arc::new(AccountEmailService::new(
        email_sender,
        settings.name.clone(),
        settings.public_base_url.clone(),
    ));

    let state = AppState {
        register_user_use_case: Arc::new(RegisterUserUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            Arc::clone(&hasher),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        activate_user_use_case: Arc::new(ActivateUserUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        login_user_use_case: Arc::new(LoginUserUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            Arc::clone(&hasher),
            Arc::clone(&social_accounts),
            tokens.clone(),
        )),
        re_login_use_case: Arc::new(ReLoginUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
        )),
        logout_user_use_case: Arc::new(LogoutUserUseCase::new(tokens.clone())),
        authenticate_user_use_case: Arc::new(AuthenticateUserUseCase::new(
            Arc::clone(&user_query),
            tokens.clone(),
        )),
        request_account_action_use_case: Arc::new(RequestAccountActionUseCase::new(
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        confirm_deactivation_use_case: Arc::new(ConfirmDeactivationUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        confirm_deletion_use_case: Arc::new(ConfirmDeletionUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        confirm_email_change_use_case: Arc::new(ConfirmEmailChangeUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        confirm_username_change_use_case: Arc::new(ConfirmUsernameChangeUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        request_reactivation_use_case: Arc::new(RequestReactivationUseCase::new(
            Arc::clone(&user_query),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        confirm_reactivation_use_case: Arc::new(ConfirmReactivationUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        request_password_reset_use_case: Arc::new(RequestPasswordResetUseCase::new(
            Arc::clone(&user_query),
            tokens.clone(),
            Arc::clone(&notifier),
        )),
        confirm_password_reset_use_case: Arc::new(ConfirmPasswordResetUseCase::new(
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            Arc::clone(&hasher),
            tokens.clone(),
            notifier,
        )),
        oauth_login_use_case: Arc::new(OAuthLoginUseCase::new(
            Arc::clone(&oauth_provider),
            Arc::clone(&oauth_states),
        )),
        oauth_callback_use_case: Arc::new(OAuthCallbackUseCase::new(
            oauth_provider,
            oauth_states,
            social_accounts,
            Arc::clone(&user_query),
            Arc::clone(&user_repo),
            hasher,
            tokens,
        )),
        metrics: Arc::clone(&account_metrics),
    };

    // Background purge of never-activated sign-ups
    let purge_ttl = config::parse_or("UNACTIVATED_USER_TTL_MINUTES", DEFAULT_UNACTIVATED_TTL_MINUTES)?;
    let purge_every = config::parse_or(
        "UNACTIVATED_USER_PURGE_INTERVAL_SECS",
        DEFAULT_PURGE_INTERVAL_SECS,
    )?;
    let purge_use_case: Arc<dyn IPurgeUnactivatedUsersUseCase> =
        Arc::new(PurgeUnactivatedUsersUseCase::new(
            Arc::clone(&user_repo),
            Arc::clone(&account_metrics),
            chrono::Duration::minutes(purge_ttl),
        ));
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let purge_worker = tokio::spawn(unactivated_user_purge_worker(
        purge_use_case,
        Duration::from_secs(purge_every.max(1)),
        shutdown_rx,
    ));

    let health_state = web::Data::new(HealthState::new(
        settings,
        Arc::clone(&db_arc),
        Arc::clone(&redis_arc),
        account_metrics,
    ));
    let openapi = ApiDoc::openapi();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(prometheus.clone())
            .app_data(web::Data::new(state.clone()))
            .app_data(health_state.clone())
            .app_data(custom_json_config())
            .service(crate::health::health)
            .service(crate::health::readiness)
            .configure(init_routes)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
    })
    .bind(server_url)?
    .run()
    .await;

    // Server has stopped; let the worker finish its current run
    if shutdown_tx.send(()).is_err() {
        warn!("Purge worker already stopped");
    }
    if let Err(e) = purge_worker.await {
        warn!(error = %e, "Purge worker ended abnormally");
    }

    result
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
