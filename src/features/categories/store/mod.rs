pub mod memory_store;
pub mod postgres_store;
pub mod seed;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::categories::models::{Category, CategoryId, CategoryUpdate, NewCategory};

pub use memory_store::InMemoryCategoryStore;
pub use postgres_store::PgCategoryStore;

/// Integrity failures raised at the storage boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("category {0} does not exist")]
    NotFound(CategoryId),

    #[error("parent category {0} does not exist")]
    UnresolvedParent(CategoryId),

    #[error("category {parent} is a descendant of category {id}")]
    CyclicParent { id: CategoryId, parent: CategoryId },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Id-keyed persistence for categories.
///
/// Implementations check parent existence and cycles on every write and
/// never reuse an id once handed out.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>>;

    /// Every stored category, ascending by id.
    async fn list(&self) -> StoreResult<Vec<Category>>;

    async fn insert(&self, category: NewCategory) -> StoreResult<Category>;

    async fn update(&self, id: CategoryId, update: CategoryUpdate) -> StoreResult<Category>;

    /// Returns `false` when nothing was stored under `id`. Children are left
    /// pointing at the removed id.
    async fn delete(&self, id: CategoryId) -> StoreResult<bool>;
}
