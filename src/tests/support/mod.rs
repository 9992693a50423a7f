pub mod app_state_builder;
pub mod auth_helper;
pub mod memory_token_cache;
pub mod stubs;
