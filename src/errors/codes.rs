use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error codes for structured API responses.
///
/// The numeric `code` of each variant is part of the public contract and is
/// never renumbered or reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid input
    BadRequest,

    /// Authentication failed
    Unauthorized,

    /// Access denied
    Forbidden,

    /// Resource not found
    NotFound,

    /// HTTP method not supported by the route
    MethodNotAllowed,

    /// Unclassified server error
    Unknown,
}

impl ErrorCode {
    /// Every declared error code, in registry order
    pub const ALL: [ErrorCode; 6] = [
        Self::BadRequest,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::MethodNotAllowed,
        Self::Unknown,
    ];

    /// Symbolic name, as it appears in the `code` field of a response
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Stable external identifier
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "990400",
            Self::Unauthorized => "990401",
            Self::Forbidden => "990403",
            Self::NotFound => "990404",
            Self::MethodNotAllowed => "990405",
            Self::Unknown => "990500",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Unknown => 500,
        }
    }

    /// Default human-readable message
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadRequest => "invalid input",
            Self::Unauthorized => "authentication failed",
            Self::Forbidden => "access denied",
            Self::NotFound => "resource not found",
            Self::MethodNotAllowed => "method not allowed",
            Self::Unknown => "unclassified server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
