use utoipa::{Modify, OpenApi};

use crate::core::app;
use crate::core::config::OpenApiConfig;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        app::health_check,
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
    ),
    components(
        schemas(
            ErrorResponse,
            categories_dtos::CategoryRequestDto,
            categories_dtos::ParentRefDto,
            categories_dtos::CategoryDetailDto,
            categories_dtos::CategoryListItemDto,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "categories", description = "Category tree administration"),
    ),
    info(
        title = "Category Admin API",
        version = "0.1.0",
        description = "CRUD administration of the category tree",
    )
)]
pub struct ApiDoc;

/// Overrides OpenAPI info from config
pub struct ApiInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl From<&OpenApiConfig> for ApiInfoModifier {
    fn from(config: &OpenApiConfig) -> Self {
        Self {
            title: config.title.clone(),
            version: config.version.clone(),
            description: config.description.clone(),
        }
    }
}

impl Modify for ApiInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

/// The generated document with config-provided info applied
pub fn document(config: &OpenApiConfig) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    ApiInfoModifier::from(config).modify(&mut openapi);
    openapi
}
