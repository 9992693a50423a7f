pub mod errors;
pub mod extractors;
pub mod routes;
