pub mod jwt;
pub mod metrics_prometheus;
pub mod oauth;
pub mod sea_orm_entity;
pub mod security;
pub mod social_account_postgres;
pub mod token_cache_redis;
pub mod user_query_postgres;
pub mod user_repository_postgres;

pub use jwt::{JwtConfig, JwtTokenService};
pub use metrics_prometheus::PrometheusAccountMetrics;
pub use oauth::{OAuth2Provider, OAuthConfig};
pub use security::Argon2Hasher;
pub use social_account_postgres::SocialAccountPostgres;
pub use token_cache_redis::RedisTokenCache;
pub use user_query_postgres::UserQueryPostgres;
pub use user_repository_postgres::UserRepositoryPostgres;
