pub mod email;
pub mod users;
