pub mod unactivated_user_purge;

pub use unactivated_user_purge::unactivated_user_purge_worker;
