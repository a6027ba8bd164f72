use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::openapi::OpenApi;

use crate::core::config::AppConfig;
use crate::core::middleware;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::shared::constants::OPENAPI_JSON_PATH;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn openapi_json(State(openapi): State<Arc<OpenApi>>) -> Json<OpenApi> {
    Json(openapi.as_ref().clone())
}

/// Full application router with the request-id, tracing and CORS layers
pub fn build_router(service: Arc<CategoryService>, config: &AppConfig, openapi: OpenApi) -> Router {
    let docs = Router::new()
        .route(OPENAPI_JSON_PATH, get(openapi_json))
        .with_state(Arc::new(openapi));

    Router::new()
        .merge(categories_routes::routes(service))
        .merge(docs)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
        .layer(middleware::cors_layer(&config.cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

/// Binds `addr` through socket2 with the listener tuning used in production
pub fn bind_listener(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address {}: {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::shared::test_helpers::{empty_service, test_app};

    #[tokio::test]
    async fn test_health_and_openapi_routes() {
        let server = TestServer::new(test_app(empty_service())).unwrap();

        server.get("/health").await.assert_status_ok();

        let doc: Value = server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"]["/admin/category/{id}"]["put"].is_object());
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let server = TestServer::new(test_app(empty_service())).unwrap();

        let response = server.get("/health").await;
        let generated = response.header(HeaderName::from_static("x-request-id"));
        assert!(!generated.is_empty());

        let response = server
            .get("/health")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("caller-supplied"),
            )
            .await;
        assert_eq!(response.header(HeaderName::from_static("x-request-id")), "caller-supplied");
    }
}
