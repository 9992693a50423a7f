pub mod account_flow;
pub mod activate_user;
pub mod authenticate_user;
pub mod confirm_deactivation;
pub mod confirm_deletion;
pub mod confirm_email_change;
pub mod confirm_password_reset;
pub mod confirm_reactivation;
pub mod confirm_username_change;
pub mod login_user;
pub mod logout_user;
pub mod oauth_callback;
pub mod oauth_login;
pub mod purge_unactivated_users;
pub mod re_login;
pub mod register_user;
pub mod request_account_action;
pub mod request_password_reset;
pub mod request_reactivation;

pub use account_flow::{AccountFlowError, IdentifierRequest};
pub use authenticate_user::SessionError;
pub use login_user::SessionTokens;
pub use oauth_callback::OAuthCallbackParams;
pub use oauth_login::OAuthError;
pub use request_account_action::AccountAction;
