mod account_action;
mod activate_user;
mod change_email;
mod change_username;
mod deactivate_user;
mod delete_user;
pub mod dto;
mod fetch_me;
mod login_user;
mod logout_user;
mod oauth;
mod re_login;
mod reactivate_user;
mod register_user;
mod reset_password;

pub use activate_user::*;
pub use change_email::*;
pub use change_username::*;
pub use deactivate_user::*;
pub use delete_user::*;
pub use fetch_me::*;
pub use login_user::*;
pub use logout_user::*;
pub use oauth::*;
pub use re_login::*;
pub use reactivate_user::*;
pub use register_user::*;
pub use reset_password::*;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register_user_handler)
        .service(activate_user_handler)
        .service(login_user_handler)
        .service(re_login_handler)
        .service(logout_user_handler)
        .service(fetch_me_handler)
        .service(request_deactivation_handler)
        .service(confirm_deactivation_handler)
        .service(request_deletion_handler)
        .service(confirm_deletion_handler)
        .service(request_email_change_handler)
        .service(confirm_email_change_handler)
        .service(request_username_change_handler)
        .service(confirm_username_change_handler)
        .service(request_reactivation_handler)
        .service(confirm_reactivation_handler)
        .service(request_password_reset_handler)
        .service(confirm_password_reset_handler)
        .service(oauth_login_handler)
        .service(oauth_callback_handler);
}
