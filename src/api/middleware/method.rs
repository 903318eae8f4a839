use axum::{
    extract::Request,
    http::{header::ALLOW, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::advice::{AppError, LOG_ID_HEADER};

/// Replaces the router's bare 405 with the `METHOD_NOT_ALLOWED` payload.
///
/// Responses already produced by the advice layer carry a log id header and
/// pass through untouched. The `Allow` header is kept.
pub async fn method_not_allowed_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;

    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(&LOG_ID_HEADER)
    {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut translated = AppError::MethodNotAllowed { method }.into_response();
    if let Some(allow) = allow {
        translated.headers_mut().insert(ALLOW, allow);
    }
    translated
}
