use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;
use crate::shared::constants::CATEGORY_BASE_PATH;

/// Create routes for the category admin resource
///
/// The collection is served with and without a trailing slash since the
/// client addresses it as `/admin/category/`.
pub fn routes(service: Arc<CategoryService>) -> Router {
    let collection = get(handlers::list_categories).post(handlers::create_category);

    Router::new()
        .route(CATEGORY_BASE_PATH, collection.clone())
        .route(&format!("{}/", CATEGORY_BASE_PATH), collection)
        .route(
            &format!("{}/{{id}}", CATEGORY_BASE_PATH),
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .with_state(service)
}
