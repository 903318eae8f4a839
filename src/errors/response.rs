use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::codes::ErrorCode;
use super::domain::{BusinessError, PaymentError};
use super::validation::{BindingFieldError, BindingResult, ConstraintViolation};

/// Reason attached to a required parameter that was not sent
pub const MISSING_PARAMETER_REASON: &str = "parameter not present";

/// One invalid input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Name or path of the offending input
    pub field: String,
    /// Stringified rejected value; empty when the value was absent
    pub value: String,
    /// Validation failure message
    pub reason: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        value: Option<impl ToString>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.map(|v| v.to_string()).unwrap_or_default(),
            reason: reason.into(),
        }
    }
}

impl From<&BindingFieldError> for FieldError {
    fn from(err: &BindingFieldError) -> Self {
        Self::new(
            err.field.clone(),
            err.rejected_value.as_deref(),
            err.message.clone(),
        )
    }
}

/// Structured error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Symbolic error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Local time the response was built
    #[schema(value_type = String, example = "2024-05-01T12:30:45.123456")]
    pub time: NaiveDateTime,
    /// Field-level details, possibly empty
    pub errors: Vec<FieldError>,
    /// Correlation id for the server-side log record
    pub log_id: Uuid,
}

impl ErrorResponse {
    /// Create an error response without field details
    pub fn from_code(code: ErrorCode, log_id: Uuid) -> Self {
        Self::from_code_with_errors(code, Vec::new(), log_id)
    }

    /// Create an error response carrying field details, in the order given
    pub fn from_code_with_errors(code: ErrorCode, errors: Vec<FieldError>, log_id: Uuid) -> Self {
        Self {
            code,
            message: code.reason().to_string(),
            time: Local::now().naive_local(),
            errors,
            log_id,
        }
    }

    /// One field error per recorded binding failure, keeping the validator's order
    pub fn from_binding_result(code: ErrorCode, result: &BindingResult, log_id: Uuid) -> Self {
        let errors = result.field_errors().iter().map(FieldError::from).collect();
        Self::from_code_with_errors(code, errors, log_id)
    }

    /// A parameter whose value could not be converted to the expected type
    pub fn from_type_mismatch(
        parameter: &str,
        rejected_value: Option<&str>,
        error_code: &str,
        log_id: Uuid,
    ) -> Self {
        let errors = vec![FieldError::new(parameter, rejected_value, error_code)];
        Self::from_code_with_errors(ErrorCode::BadRequest, errors, log_id)
    }

    /// A required parameter that was not sent
    pub fn from_missing_parameter(parameter: &str, log_id: Uuid) -> Self {
        let errors = vec![FieldError::new(
            parameter,
            None::<&str>,
            MISSING_PARAMETER_REASON,
        )];
        Self::from_code_with_errors(ErrorCode::BadRequest, errors, log_id)
    }

    /// One field error per violation. The rejected value is not reported.
    pub fn from_constraint_violations(violations: &[ConstraintViolation], log_id: Uuid) -> Self {
        let errors = violations
            .iter()
            .map(|v| FieldError::new(v.property_name(), None::<&str>, v.message.clone()))
            .collect();
        Self::from_code_with_errors(ErrorCode::BadRequest, errors, log_id)
    }

    pub fn from_payment_error(err: &PaymentError, log_id: Uuid) -> Self {
        let errors = vec![FieldError::new("orderId", Some(&err.order_id), "")];
        Self::from_code_with_errors(err.code, errors, log_id)
    }

    pub fn from_business_error(err: &BusinessError, log_id: Uuid) -> Self {
        Self::from_code(err.code, log_id)
    }
}
