pub mod user_social_auth;
pub mod users;
