use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use uuid::Uuid;

use crate::modules::users::application::domain::TokenPurpose;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    TokenExpired,
    TokenNotYetValid,
    InvalidTokenType(String),
    InvalidSignature,
    InvalidIssuer,
    MalformedToken,
    EncodingError(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::TokenExpired => write!(f, "Token has expired"),
            TokenError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            TokenError::InvalidTokenType(expected) => {
                write!(f, "Invalid token type, expected: {}", expected)
            }
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
            TokenError::InvalidIssuer => write!(f, "Token issuer or audience mismatch"),
            TokenError::MalformedToken => write!(f, "Malformed token"),
            TokenError::EncodingError(msg) => write!(f, "Token encoding error: {}", msg),
        }
    }
}
impl Error for TokenError {}

/// JWT claims shared by every token purpose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,          // User ID
    pub iss: String,        // Project slug
    pub aud: String,        // Project slug
    pub exp: i64,           // Expiration timestamp
    pub iat: i64,           // Issued at
    pub nbf: i64,           // Not before
    pub token_type: String, // TokenPurpose::as_str
    pub jti: Uuid,          // Unique per issued token
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry, also used as the cache TTL
    pub expires_in: i64,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenProvider: Send + Sync {
    fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> Result<IssuedToken, TokenError>;
    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<TokenClaims, TokenError>;
    fn lifetime_secs(&self, purpose: TokenPurpose) -> i64;
}
