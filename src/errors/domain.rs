use thiserror::Error;

use super::codes::ErrorCode;

/// Failure raised by application logic with a code picked by the raiser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .code.reason())]
pub struct BusinessError {
    pub code: ErrorCode,
}

impl BusinessError {
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }
}

/// Payment failure; reported with the order it concerns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} (order '{}')", .code.reason(), .order_id)]
pub struct PaymentError {
    pub code: ErrorCode,
    /// Empty when the failure is not tied to an order
    pub order_id: String,
}

impl PaymentError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            order_id: String::new(),
        }
    }

    pub fn for_order(code: ErrorCode, order_id: impl Into<String>) -> Self {
        Self {
            code,
            order_id: order_id.into(),
        }
    }
}
