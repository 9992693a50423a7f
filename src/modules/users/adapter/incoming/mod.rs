pub mod scheduler;
pub mod web;
