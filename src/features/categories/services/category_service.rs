use std::collections::HashSet;
use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result, ValidationError, ViolationKind};
use crate::features::categories::dtos::CategoryRequestDto;
use crate::features::categories::models::{
    Category, CategoryId, CategoryLineage, CategoryUpdate, NewCategory,
};
use crate::features::categories::store::{CategoryStore, StoreError};

/// Outcome of a single-category read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLookup {
    Found(CategoryLineage),
    NotFound,
}

enum ParentChain {
    /// Ancestors above and including the parent, nearest first
    Resolved(Vec<Category>),
    /// First id on the chain with no stored category
    Unresolved(CategoryId),
    /// The category being updated sits on the chain
    Cyclic(CategoryId),
}

/// Service for category CRUD over an injected store
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// All categories in store order, parents left as ids
    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = self.store.list().await?;
        tracing::debug!("Listed {} categories", categories.len());
        Ok(categories)
    }

    pub async fn get(&self, id: CategoryId) -> Result<CategoryLookup> {
        match self.store.get(id).await? {
            Some(category) => Ok(CategoryLookup::Found(self.lineage(category).await?)),
            None => {
                tracing::debug!("Category {} not found", id);
                Ok(CategoryLookup::NotFound)
            }
        }
    }

    pub async fn create(&self, dto: CategoryRequestDto) -> Result<CategoryLineage> {
        let (update, ancestors) = self.validate(None, &dto).await?;

        let created_at = chrono::Local::now().naive_local();
        let category = self
            .store
            .insert(update.into_new(created_at))
            .await
            .map_err(integrity_error)?;

        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(CategoryLineage {
            category,
            ancestors,
        })
    }

    pub async fn update(&self, id: CategoryId, dto: CategoryRequestDto) -> Result<CategoryLineage> {
        let (update, ancestors) = self.validate(Some(id), &dto).await?;

        let category = self
            .store
            .update(id, update)
            .await
            .map_err(integrity_error)?;

        tracing::info!("Updated category {} ({})", category.id, category.name);
        Ok(CategoryLineage {
            category,
            ancestors,
        })
    }

    /// Returns whether a category was removed; deleting a missing id is not
    /// an error.
    pub async fn delete(&self, id: CategoryId) -> Result<bool> {
        let removed = self.store.delete(id).await?;
        if removed {
            tracing::info!("Deleted category {}", id);
        } else {
            tracing::debug!("Delete of missing category {} ignored", id);
        }
        Ok(removed)
    }

    /// Collects every violation of `dto` (and of `target` on update) before
    /// anything is written. On success also returns the resolved chain above
    /// the requested parent, nearest first.
    async fn validate(
        &self,
        target: Option<CategoryId>,
        dto: &CategoryRequestDto,
    ) -> Result<(CategoryUpdate, Vec<Category>)> {
        let mut violations = dto
            .validate()
            .map(|_| ValidationError::default())
            .unwrap_or_else(ValidationError::from);

        if let Some(id) = target {
            if self.store.get(id).await?.is_none() {
                violations.push(
                    ViolationKind::NotFound,
                    "id",
                    format!("category {} does not exist", id),
                );
            }
        }

        let mut ancestors = Vec::new();
        if let Some(parent) = dto.parent_id() {
            match self.parent_chain(target, parent).await? {
                ParentChain::Resolved(chain) => ancestors = chain,
                ParentChain::Unresolved(missing) => violations.push(
                    ViolationKind::UnresolvedReference,
                    "parent",
                    format!("category {} does not exist", missing),
                ),
                ParentChain::Cyclic(id) if id == parent => violations.push(
                    ViolationKind::CyclicReference,
                    "parent",
                    format!("category {} cannot be its own parent", parent),
                ),
                ParentChain::Cyclic(id) => violations.push(
                    ViolationKind::CyclicReference,
                    "parent",
                    format!("category {} is a descendant of category {}", parent, id),
                ),
            }
        }

        violations.into_result()?;

        let update = CategoryUpdate {
            name: dto.name.clone().unwrap_or_default(),
            visible: dto.visible.unwrap_or_default(),
            header: dto.header.clone(),
            image_path: dto.image_path.clone(),
            parent_id: dto.parent_id(),
        };
        Ok((update, ancestors))
    }

    /// Walks up from `parent` to the root. Every link must resolve, and
    /// `target` must not appear on the way.
    async fn parent_chain(
        &self,
        target: Option<CategoryId>,
        parent: CategoryId,
    ) -> Result<ParentChain> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(parent);

        while let Some(current) = cursor {
            if target == Some(current) {
                return Ok(ParentChain::Cyclic(current));
            }
            if !seen.insert(current) {
                break;
            }
            match self.store.get(current).await? {
                Some(category) => {
                    cursor = category.parent_id;
                    chain.push(category);
                }
                None => return Ok(ParentChain::Unresolved(current)),
            }
        }

        Ok(ParentChain::Resolved(chain))
    }

    /// Resolves the ancestor chain of `category`. A parent id that no longer
    /// resolves (its category was deleted) is reported as a violation.
    async fn lineage(&self, category: Category) -> Result<CategoryLineage> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([category.id]);
        let mut cursor = category.parent_id;

        while let Some(parent_id) = cursor {
            if !seen.insert(parent_id) {
                break;
            }
            let parent = self.store.get(parent_id).await?.ok_or_else(|| {
                tracing::warn!(
                    "Category {} has dangling parent reference {}",
                    category.id,
                    parent_id
                );
                AppError::Validation(ValidationError::single(
                    ViolationKind::UnresolvedReference,
                    "parent",
                    format!("category {} does not exist", parent_id),
                ))
            })?;
            cursor = parent.parent_id;
            ancestors.push(parent);
        }

        Ok(CategoryLineage {
            category,
            ancestors,
        })
    }
}

/// Integrity failures the store caught after validation passed (a concurrent
/// delete, for instance) are still violations, not server errors.
fn integrity_error(err: StoreError) -> AppError {
    let violation = match &err {
        StoreError::NotFound(id) => ValidationError::single(
            ViolationKind::NotFound,
            "id",
            format!("category {} does not exist", id),
        ),
        StoreError::UnresolvedParent(parent) => ValidationError::single(
            ViolationKind::UnresolvedReference,
            "parent",
            format!("category {} does not exist", parent),
        ),
        StoreError::CyclicParent { .. } => {
            ValidationError::single(ViolationKind::CyclicReference, "parent", err.to_string())
        }
        StoreError::Database(_) => return AppError::Store(err),
    };
    AppError::Validation(violation)
}
