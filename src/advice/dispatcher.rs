use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};
use uuid::Uuid;

use super::error::AppError;
use crate::errors::{ErrorCode, ErrorResponse};
use crate::metrics::ERRORS_HANDLED_TOTAL;

/// Response header carrying the correlation id
pub static LOG_ID_HEADER: HeaderName = HeaderName::from_static("x-log-id");

/// Translate a failure into its status and payload.
///
/// Emits exactly one log record keyed by a fresh log id. The full detail,
/// including the cause chain, only ever goes to the log.
pub fn translate(err: &AppError) -> (StatusCode, ErrorResponse) {
    let log_id = Uuid::new_v4();

    let body = match err {
        AppError::MethodNotAllowed { .. } => {
            ErrorResponse::from_code(ErrorCode::MethodNotAllowed, log_id)
        }
        AppError::Bind(result) | AppError::ArgumentNotValid(result) => {
            ErrorResponse::from_binding_result(ErrorCode::BadRequest, result, log_id)
        }
        AppError::Authentication(_) => ErrorResponse::from_code(ErrorCode::Unauthorized, log_id),
        AppError::MissingParameter { name } => ErrorResponse::from_missing_parameter(name, log_id),
        AppError::TypeMismatch {
            name,
            value,
            error_code,
        } => ErrorResponse::from_type_mismatch(name, value.as_deref(), error_code, log_id),
        AppError::ConstraintViolation(violations) => {
            ErrorResponse::from_constraint_violations(violations, log_id)
        }
        AppError::IllegalArgument(_) => ErrorResponse::from_code(ErrorCode::BadRequest, log_id),
        AppError::AccessDenied(_) => ErrorResponse::from_code(ErrorCode::Forbidden, log_id),
        AppError::Payment(payment) => ErrorResponse::from_payment_error(payment, log_id),
        AppError::Business(business) => ErrorResponse::from_business_error(business, log_id),
        AppError::Unhandled(_) => ErrorResponse::from_code(ErrorCode::Unknown, log_id),
    };

    let status = StatusCode::from_u16(body.code.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(
            log_id = %log_id,
            kind = err.kind(),
            code = %body.code,
            status = status.as_u16(),
            detail = %err.detail(),
            "Request failed"
        );
    } else {
        warn!(
            log_id = %log_id,
            kind = err.kind(),
            code = %body.code,
            status = status.as_u16(),
            detail = %err.detail(),
            "Request rejected"
        );
    }

    ERRORS_HANDLED_TOTAL
        .with_label_values(&[body.code.name(), status.as_str()])
        .inc();

    (status, body)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = translate(&self);
        let log_id = HeaderValue::from_str(&body.log_id.to_string()).ok();

        let mut response = (status, Json(body)).into_response();
        if let Some(log_id) = log_id {
            response.headers_mut().insert(LOG_ID_HEADER.clone(), log_id);
        }
        response
    }
}
