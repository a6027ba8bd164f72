use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryListItemDto, CategoryRequestDto,
};
use crate::features::categories::models::CategoryId;
use crate::features::categories::services::{CategoryLookup, CategoryService};
use crate::shared::constants::CATEGORY_BASE_PATH;
use crate::shared::types::ErrorResponse;

/// List every category
///
/// Parents are returned as bare ids.
#[utoipa::path(
    get,
    path = "/admin/category",
    responses(
        (status = 200, description = "All categories in id order", body = Vec<CategoryListItemDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryListItemDto>>> {
    let categories = service.list().await?;
    Ok(Json(
        categories
            .into_iter()
            .map(CategoryListItemDto::from)
            .collect(),
    ))
}

/// Get a category with its parent chain expanded
#[utoipa::path(
    get,
    path = "/admin/category/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryDetailDto),
        (status = 204, description = "No category with this id"),
        (status = 400, description = "Stored parent reference no longer resolves", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<Response> {
    match service.get(id).await? {
        CategoryLookup::Found(lineage) => {
            Ok(Json(CategoryDetailDto::from(lineage)).into_response())
        }
        CategoryLookup::NotFound => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Create a category
#[utoipa::path(
    post,
    path = "/admin/category",
    request_body = CategoryRequestDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDetailDto,
            headers(("Location" = String, description = "Path of the new category"))),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CategoryRequestDto>,
) -> Result<impl IntoResponse> {
    let lineage = service.create(dto).await?;
    let location = format!("{}/{}", CATEGORY_BASE_PATH, lineage.category.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CategoryDetailDto::from(lineage)),
    ))
}

/// Replace every mutable field of a category
#[utoipa::path(
    put,
    path = "/admin/category/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    request_body = CategoryRequestDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryDetailDto),
        (status = 400, description = "Validation failed or unknown id", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
    AppJson(dto): AppJson<CategoryRequestDto>,
) -> Result<Json<CategoryDetailDto>> {
    let lineage = service.update(id, dto).await?;
    Ok(Json(CategoryDetailDto::from(lineage)))
}

/// Delete a category
///
/// Succeeds whether or not the category existed. Children are not touched.
#[utoipa::path(
    delete,
    path = "/admin/category/{id}",
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 204, description = "Category deleted or already absent")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
