//! BookSwap HTTP service
//!
//! ```text
//! axum handlers (api/)
//!   ↓ user checks via UserDirectory
//! ItemCatalogue<Book> / ItemCatalogue<Magazine>
//!   ↓
//! in-memory maps or PostgreSQL, PostingService on swap
//! ```
//!
//! `main.rs` loads [`Config`], wires an [`AppState`] and serves [`build_router`].

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

pub use config::{Config, StorageBackend};
pub use state::AppState;

use axum::{Router, middleware};
use axum_helpers::{create_router, health_router};
use observability::metrics_middleware;
use std::io;

/// The full application: `/api/*` with docs UIs, plus `/health`, `/ready`
/// and `/metrics`, all recorded by the HTTP metrics middleware.
pub fn build_router(state: AppState) -> io::Result<Router> {
    let router = create_router::<openapi::ApiDoc>(
        api::routes(&state),
        state.config.cors_allowed_origin.as_deref(),
    )?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state))
        .merge(api::metrics_router())
        .layer(middleware::from_fn(metrics_middleware)))
}
