pub mod oauth_client;
pub mod oauth_config;

pub use oauth_client::OAuth2Provider;
pub use oauth_config::OAuthConfig;
