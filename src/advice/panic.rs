use std::any::Any;

use axum::response::{IntoResponse, Response};

use super::error::AppError;

/// Turns a panicking handler into the `UNKNOWN` payload.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Unhandled(anyhow::anyhow!("handler panicked: {message}")).into_response()
}
