use crate::errors::not_found;
use crate::http::{cors_layer_from_origins, security_headers};
use super::shutdown::shutdown_signal;
use axum::{Router, extract::DefaultBodyLimit, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Request bodies above this size are rejected with 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Wraps the API routes with documentation UIs and cross-cutting layers.
///
/// - `/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar`, `/api-docs/openapi.json`
/// - API routes nested under `/api`
/// - JSON 404 fallback, request tracing, security headers, compression
/// - 1 MiB body limit
/// - CORS only when `cors_origins` is given (comma-separated)
///
/// Routes must already have their state applied.
pub fn create_router<T>(apis: Router, cors_origins: Option<&str>) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = match cors_origins {
        Some(origins) => {
            let cors = cors_layer_from_origins(origins)?;
            info!(origins, "CORS enabled");
            router.layer(cors)
        }
        None => router,
    };

    Ok(router.layer(CompressionLayer::new()))
}

/// Serves `router` until SIGINT/SIGTERM, then drains in-flight requests and
/// runs `cleanup` (closing pools etc.) bounded by the configured shutdown timeout.
pub async fn create_app<F>(router: Router, server_config: &ServerConfig, cleanup: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown_timeout = server_config.shutdown_timeout;
    let listener = tokio::net::TcpListener::bind(server_config.socket_addr()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    info!(timeout = ?shutdown_timeout, "Running cleanup");
    if tokio::time::timeout(shutdown_timeout, cleanup).await.is_err() {
        warn!(timeout = ?shutdown_timeout, "Cleanup timed out, forcing shutdown");
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::post};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct EmptyDoc;

    fn api() -> Router {
        Router::new().route("/echo", post(|body: String| async move { body.len().to_string() }))
    }

    #[tokio::test]
    async fn test_routes_nested_under_api() {
        let app = create_router::<EmptyDoc>(api(), None).unwrap();
        let response = app
            .oneshot(Request::post("/api/echo").body(Body::from("hi")).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let app = create_router::<EmptyDoc>(api(), None).unwrap();
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let app = create_router::<EmptyDoc>(api(), None).unwrap();
        let body = vec![b'a'; MAX_BODY_BYTES + 1];
        let response = app
            .oneshot(Request::post("/api/echo").body(Body::from(body)).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_invalid_cors_origins_fail_router_creation() {
        assert!(create_router::<EmptyDoc>(api(), Some(" ")).is_err());
    }
}
