pub mod entities;
pub mod oauth;
pub mod token_purpose;
pub mod validation;

pub use entities::{NewUser, User};
pub use oauth::{OAuthBackend, OAuthProfile};
pub use token_purpose::TokenPurpose;
