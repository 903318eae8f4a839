use std::error::Error as StdError;
use thiserror::Error;

use crate::errors::{BindingResult, BusinessError, ConstraintViolation, PaymentError};

/// Every failure a handler can hand back to the advice layer.
///
/// Each variant is one recognized upstream shape; `Unhandled` is the
/// catch-all and always maps to `UNKNOWN`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("request method '{method}' is not supported")]
    MethodNotAllowed { method: String },

    /// Query or form binding failed
    #[error("binding failed: {0}")]
    Bind(BindingResult),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("required parameter '{name}' is not present")]
    MissingParameter { name: String },

    #[error("parameter '{name}' could not be converted: {error_code}")]
    TypeMismatch {
        name: String,
        value: Option<String>,
        error_code: String,
    },

    #[error("{} constraint violation(s)", .0.len())]
    ConstraintViolation(Vec<ConstraintViolation>),

    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Request body failed validation
    #[error("argument not valid: {0}")]
    ArgumentNotValid(BindingResult),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl AppError {
    /// Type name recorded in the log; never sent to the client
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed { .. } => "MethodNotAllowed",
            Self::Bind(_) => "Bind",
            Self::Authentication(_) => "Authentication",
            Self::MissingParameter { .. } => "MissingParameter",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::ConstraintViolation(_) => "ConstraintViolation",
            Self::IllegalArgument(_) => "IllegalArgument",
            Self::ArgumentNotValid(_) => "ArgumentNotValid",
            Self::AccessDenied(_) => "AccessDenied",
            Self::Payment(_) => "PaymentError",
            Self::Business(_) => "BusinessError",
            Self::Unhandled(_) => "Unhandled",
        }
    }

    /// Message of this error followed by every cause, joined with ": "
    pub fn detail(&self) -> String {
        std::iter::successors(Some(self as &(dyn StdError + 'static)), |&e| e.source())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ")
    }
}
