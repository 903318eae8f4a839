//! Error registry, payload and the failure types translated by the advice layer

pub mod codes;
pub mod domain;
pub mod response;
pub mod validation;

pub use codes::ErrorCode;
pub use domain::{BusinessError, PaymentError};
pub use response::{ErrorResponse, FieldError};
pub use validation::{BindingFieldError, BindingResult, ConstraintViolation, Validate};
