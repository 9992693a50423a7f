pub mod account_metrics;
pub mod oauth_provider;
pub mod oauth_state_store;
pub mod password_hasher;
pub mod social_account;
pub mod token_cache;
pub mod token_provider;
pub mod user_query;
pub mod user_repository;

pub use account_metrics::{AccountMetrics, NoOpAccountMetrics, UserAction};
pub use oauth_provider::{AuthorizationRequest, OAuthProvider, OAuthProviderError};
pub use oauth_state_store::OAuthStateStore;
pub use password_hasher::{HashError, PasswordHasher};
pub use social_account::SocialAccountStore;
pub use token_cache::{TokenCache, TokenCacheError};
pub use token_provider::{IssuedToken, TokenClaims, TokenError, TokenProvider};
pub use user_query::{UserQuery, UserQueryError};
pub use user_repository::{UserRepository, UserRepositoryError};
