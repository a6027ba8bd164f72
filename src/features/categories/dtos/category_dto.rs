use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryId, CategoryLineage};

/// Parent reference inside a request body. Only `id` is read; any other
/// fields of the embedded parent are ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ParentRefDto {
    #[schema(value_type = i32)]
    pub id: CategoryId,
}

/// Request body for create and update. `id` and `createdAt` may be present
/// but are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequestDto {
    #[validate(
        required(message = "must not be null"),
        length(min = 1, message = "must not be empty")
    )]
    pub name: Option<String>,

    #[validate(required(message = "must not be null"))]
    pub visible: Option<bool>,

    pub header: Option<String>,

    pub image_path: Option<String>,

    pub parent: Option<ParentRefDto>,
}

impl CategoryRequestDto {
    pub fn parent_id(&self) -> Option<CategoryId> {
        self.parent.as_ref().map(|p| p.id)
    }
}

/// Single-category representation; `parent` is expanded up to the root
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryDetailDto {
    #[schema(value_type = i32)]
    pub id: CategoryId,
    pub name: String,
    pub visible: bool,
    pub header: Option<String>,
    pub image_path: Option<String>,
    pub parent: Option<Box<CategoryDetailDto>>,
    #[schema(value_type = String, example = "2002-01-01T00:00:00")]
    pub created_at: NaiveDateTime,
}

impl CategoryDetailDto {
    fn with_parent(category: Category, parent: Option<Box<CategoryDetailDto>>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            visible: category.visible,
            header: category.header,
            image_path: category.image_path,
            parent,
            created_at: category.created_at,
        }
    }
}

impl From<CategoryLineage> for CategoryDetailDto {
    fn from(lineage: CategoryLineage) -> Self {
        // ancestors run nearest-first, so build from the root down
        let parent = lineage
            .ancestors
            .into_iter()
            .rev()
            .fold(None, |above, ancestor| {
                Some(Box::new(Self::with_parent(ancestor, above)))
            });

        Self::with_parent(lineage.category, parent)
    }
}

/// List representation; `parent` is the bare parent id
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListItemDto {
    #[schema(value_type = i32)]
    pub id: CategoryId,
    pub name: String,
    pub visible: bool,
    pub header: Option<String>,
    pub image_path: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub parent: Option<CategoryId>,
    #[schema(value_type = String, example = "2002-01-01T00:00:00")]
    pub created_at: NaiveDateTime,
}

impl From<Category> for CategoryListItemDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            visible: c.visible,
            header: c.header,
            image_path: c.image_path,
            parent: c.parent_id,
            created_at: c.created_at,
        }
    }
}
