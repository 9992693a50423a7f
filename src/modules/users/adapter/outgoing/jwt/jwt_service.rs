use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::modules::users::application::domain::TokenPurpose;
use crate::modules::users::application::ports::outgoing::{
    IssuedToken, TokenClaims, TokenError, TokenProvider,
};

use super::jwt_config::JwtConfig;

struct PurposeKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_secs: i64,
}

#[derive(Clone)]
pub struct JwtTokenService {
    issuer: String,
    keys: std::sync::Arc<HashMap<TokenPurpose, PurposeKeys>>,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("purposes", &self.keys.len())
            .finish()
    }
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let keys = TokenPurpose::ALL
            .into_iter()
            .filter_map(|purpose| {
                config.key(purpose).map(|key| {
                    (
                        purpose,
                        PurposeKeys {
                            encoding: EncodingKey::from_secret(key.secret.as_bytes()),
                            decoding: DecodingKey::from_secret(key.secret.as_bytes()),
                            expiry_secs: key.expiry_secs,
                        },
                    )
                })
            })
            .collect();

        Self {
            issuer: config.issuer,
            keys: std::sync::Arc::new(keys),
        }
    }

    fn keys_for(&self, purpose: TokenPurpose) -> Result<&PurposeKeys, TokenError> {
        self.keys.get(&purpose).ok_or_else(|| {
            TokenError::EncodingError(format!("No signing key configured for {}", purpose))
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation
    }
}

impl TokenProvider for JwtTokenService {
    fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> Result<IssuedToken, TokenError> {
        let keys = self.keys_for(purpose)?;
        let now = Utc::now();
        let expiration = now + Duration::seconds(keys.expiry_secs);

        let claims = TokenClaims {
            sub: user_id,
            iss: self.issuer.clone(),
            aud: self.issuer.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            token_type: purpose.as_str().to_string(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::EncodingError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: keys.expiry_secs,
        })
    }

    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<TokenClaims, TokenError> {
        let keys = self.keys_for(purpose)?;

        let decoded = decode::<TokenClaims>(token, &keys.decoding, &self.validation()).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;

                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("{} token verification failed: Token expired", purpose);
                        TokenError::TokenExpired
                    }
                    ErrorKind::ImmatureSignature => {
                        tracing::warn!("{} token verification failed: Not yet valid", purpose);
                        TokenError::TokenNotYetValid
                    }
                    ErrorKind::InvalidSignature => {
                        tracing::warn!("Invalid signature on {} token", purpose);
                        TokenError::InvalidSignature
                    }
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        tracing::warn!("{} token issued for another project", purpose);
                        TokenError::InvalidIssuer
                    }
                    ErrorKind::InvalidToken | ErrorKind::InvalidAlgorithm => {
                        tracing::warn!("Malformed or invalid algorithm {} token", purpose);
                        TokenError::MalformedToken
                    }
                    _ => {
                        tracing::debug!("{} token verification failed: {}", purpose, e);
                        TokenError::MalformedToken
                    }
                }
            },
        )?;

        if decoded.claims.token_type != purpose.as_str() {
            tracing::warn!(
                "Token type mismatch: expected '{}', got '{}'",
                purpose,
                decoded.claims.token_type
            );
            return Err(TokenError::InvalidTokenType(purpose.as_str().to_string()));
        }

        Ok(decoded.claims)
    }

    fn lifetime_secs(&self, purpose: TokenPurpose) -> i64 {
        self.keys
            .get(&purpose)
            .map(|keys| keys.expiry_secs)
            .unwrap_or_else(|| purpose.default_expiry_secs())
    }
}
