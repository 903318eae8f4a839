pub mod logging;
pub mod method;

pub use logging::logging_middleware;
pub use method::method_not_allowed_middleware;
