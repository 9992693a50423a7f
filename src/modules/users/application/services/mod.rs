pub mod token_lifecycle;

pub use token_lifecycle::{TokenLifecycle, TokenLifecycleError};
