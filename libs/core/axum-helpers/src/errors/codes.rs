//! Error codes carried in every error response.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::NotAvailable.as_str(), "NOT_AVAILABLE");
//! assert_eq!(ErrorCode::NotAvailable.code(), 1006);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Machine-readable error identifiers.
///
/// Integer ranges: 1000s client errors, 1500s server and upstream errors,
/// 2000s database errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidUuid,
    /// Malformed or mistyped JSON body
    InvalidJson,
    NotFound,
    BadRequest,
    /// The item exists but has already been swapped
    NotAvailable,

    InternalError,
    /// A downstream service (e.g. order posting) failed
    UpstreamFailure,

    DatabaseError,
    /// Connection pool exhausted or closed
    DatabaseUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotAvailable => "NOT_AVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::UpstreamFailure => "UPSTREAM_FAILURE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
        }
    }

    /// Integer code used in structured logs and metrics.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::NotAvailable => 1006,

            Self::InternalError => 1500,
            Self::UpstreamFailure => 1502,

            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::InvalidJson => "Invalid JSON body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::NotAvailable => "Item is not available for swapping",
            Self::InternalError => "An internal server error occurred",
            Self::UpstreamFailure => "A downstream service failed",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_and_integer() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::UpstreamFailure.as_str(), "UPSTREAM_FAILURE");
        assert_eq!(ErrorCode::UpstreamFailure.code(), 1502);
        assert_eq!(ErrorCode::DatabaseError.code(), 2001);
    }

    #[test]
    fn test_error_code_display_matches_serde() {
        let json = serde_json::to_string(&ErrorCode::NotAvailable).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::NotAvailable));

        let parsed: ErrorCode = serde_json::from_str("\"INVALID_UUID\"").unwrap();
        assert_eq!(parsed, ErrorCode::InvalidUuid);
    }
}
