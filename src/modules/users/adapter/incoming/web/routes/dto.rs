use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::users::application::domain::User;
use crate::modules::users::application::use_cases::SessionTokens;

/// Public view of an account. The password hash never leaves the service.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailDto {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: Uuid,

    #[schema(example = "johndoe")]
    pub username: String,

    #[schema(example = "john@example.com")]
    pub email: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = true)]
    pub is_active: bool,

    #[schema(example = false)]
    pub is_staff: bool,

    #[schema(example = false)]
    pub is_superuser: bool,

    pub date_joined: DateTime<Utc>,

    /// `null` until the first successful login
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserDetailDto {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

/// User detail plus the session tokens, answered by login and re-login.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    #[serde(flatten)]
    pub user: UserDetailDto,

    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
}

impl From<SessionTokens> for SessionDto {
    fn from(session: SessionTokens) -> Self {
        Self {
            user: session.user.into(),
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

/// Payload of the unauthenticated reactivation and password reset requests
#[derive(Deserialize, ToSchema)]
pub struct IdentifierDto {
    /// Username or email, case-insensitive
    #[schema(example = "johndoe")]
    #[serde(default)]
    pub identifier: Option<String>,

    /// Must repeat `identifier`
    #[schema(example = "johndoe")]
    #[serde(default)]
    pub re_identifier: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::application::domain::entities::fixtures::inactive_user;

    #[test]
    fn test_user_detail_hides_hash_and_adds_full_name() {
        let value = serde_json::to_value(UserDetailDto::from(inactive_user())).unwrap();

        assert_eq!(value["full_name"], "John Doe");
        assert_eq!(value["is_active"], false);
        assert!(value["last_login"].is_null());
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_session_flattens_user_fields() {
        let value = serde_json::to_value(SessionDto::from(SessionTokens {
            user: inactive_user(),
            access_token: "access".into(),
            refresh_token: "refresh".into(),
        }))
        .unwrap();

        assert_eq!(value["username"], "johndoe");
        assert_eq!(value["access_token"], "access");
        assert_eq!(value["refresh_token"], "refresh");
        assert!(value.get("user").is_none());
    }
}
