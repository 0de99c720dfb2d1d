use axum::{Router, routing::get};

pub mod health;
pub mod index;
pub mod items;
pub mod response;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .with_state(state.clone())
        .merge(items::router(state.clone()))
        .nest("/users", users::router(state.clone()))
}

/// `/ready` with a database check, mounted outside `/api`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// Prometheus text exposition at `/metrics`.
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(observability::metrics_handler))
}
