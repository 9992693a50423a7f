use std::sync::Arc;

use crate::modules::users::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{NoOpAccountMetrics, TokenCache};
use crate::modules::users::application::services::TokenLifecycle;

pub const TEST_ISSUER: &str = "initstack";

/// Signs every purpose with its own throwaway secret and the default lifetime.
pub fn test_token_service() -> Arc<JwtTokenService> {
    let config = TokenPurpose::ALL
        .into_iter()
        .fold(JwtConfig::new(TEST_ISSUER), |config, purpose| {
            config.with_key(
                purpose,
                format!("FAKE_{}_SECRET_FOR_TESTS_ONLY_000000", purpose.env_prefix()),
                purpose.default_expiry_secs(),
            )
        });
    Arc::new(JwtTokenService::new(config))
}

pub fn test_lifecycle(cache: Arc<dyn TokenCache>) -> TokenLifecycle {
    TokenLifecycle::new(test_token_service(), cache, Arc::new(NoOpAccountMetrics))
}
