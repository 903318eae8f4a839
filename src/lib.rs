// Library exports for testing
pub mod advice;
pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
