//! Translation of handler failures into HTTP error responses

pub mod dispatcher;
pub mod error;
pub mod panic;

pub use dispatcher::{translate, LOG_ID_HEADER};
pub use error::AppError;
pub use panic::handle_panic;
