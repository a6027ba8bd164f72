use std::sync::Arc;

use axum::Router;

use crate::core::app::build_router;
use crate::core::config::{AppConfig, OpenApiConfig};
use crate::core::openapi;
use crate::features::categories::store::{seed, InMemoryCategoryStore};
use crate::features::categories::CategoryService;

/// Service over an in-memory store holding the vehicles catalog
pub fn seeded_service() -> Arc<CategoryService> {
    Arc::new(CategoryService::new(Arc::new(
        InMemoryCategoryStore::with_categories(seed::catalog()),
    )))
}

pub fn empty_service() -> Arc<CategoryService> {
    Arc::new(CategoryService::new(Arc::new(InMemoryCategoryStore::new())))
}

/// The production router over `service`, default app config
pub fn test_app(service: Arc<CategoryService>) -> Router {
    build_router(
        service,
        &AppConfig::default(),
        openapi::document(&OpenApiConfig::default()),
    )
}

/// Serves `router` on an ephemeral localhost port and returns its base URL
pub async fn spawn_app(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
