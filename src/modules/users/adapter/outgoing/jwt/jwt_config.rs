use std::collections::HashMap;

use crate::modules::users::application::domain::TokenPurpose;
use crate::shared::config::{self, ConfigError};

/// HS256 needs at least 32 bytes of key material
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct PurposeKey {
    pub secret: String,
    pub expiry_secs: i64, // Expiration in seconds
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Used for both `iss` and `aud`
    pub issuer: String,
    keys: HashMap<TokenPurpose, PurposeKey>,
}

impl JwtConfig {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            keys: HashMap::new(),
        }
    }

    pub fn with_key(
        mut self,
        purpose: TokenPurpose,
        secret: impl Into<String>,
        expiry_secs: i64,
    ) -> Self {
        self.keys.insert(
            purpose,
            PurposeKey {
                secret: secret.into(),
                expiry_secs,
            },
        );
        self
    }

    pub fn key(&self, purpose: TokenPurpose) -> Option<&PurposeKey> {
        self.keys.get(&purpose)
    }

    /// Reads `{PURPOSE}_TOKEN_SECRET` and `{PURPOSE}_TOKEN_EXPIRY` for every purpose.
    pub fn from_env(issuer: impl Into<String>) -> Result<Self, ConfigError> {
        let mut jwt_config = Self::new(issuer);

        for purpose in TokenPurpose::ALL {
            let secret_key = format!("{}_TOKEN_SECRET", purpose.env_prefix());
            let expiry_key = format!("{}_TOKEN_EXPIRY", purpose.env_prefix());

            let secret = config::required(&secret_key)?;
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::Invalid {
                    key: secret_key,
                    reason: format!("must be at least {} characters long", MIN_SECRET_LEN),
                });
            }

            let expiry_secs = config::parse_or(&expiry_key, purpose.default_expiry_secs())?;
            if expiry_secs <= 0 {
                return Err(ConfigError::Invalid {
                    key: expiry_key,
                    reason: "must be a positive number of seconds".to_string(),
                });
            }

            jwt_config = jwt_config.with_key(purpose, secret, expiry_secs);
        }

        if let (Some(access), Some(refresh)) = (
            jwt_config.key(TokenPurpose::Access),
            jwt_config.key(TokenPurpose::Refresh),
        ) {
            if refresh.expiry_secs <= access.expiry_secs {
                return Err(ConfigError::Invalid {
                    key: "REFRESH_TOKEN_EXPIRY".to_string(),
                    reason: "must be greater than ACCESS_TOKEN_EXPIRY".to_string(),
                });
            }
        }

        Ok(jwt_config)
    }
}
