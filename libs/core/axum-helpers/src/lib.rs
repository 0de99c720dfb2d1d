//! # Axum Helpers
//!
//! Shared HTTP plumbing for the BookSwap API.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the uniform JSON error body
//! - **[`extractors`]**: UUID path and validated JSON extractors

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, MAX_BODY_BYTES, create_app, create_router, health_router,
    run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_origins, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, error_response};

pub use extractors::{UuidPath, ValidatedJson};
