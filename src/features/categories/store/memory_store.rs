use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::features::categories::models::{Category, CategoryId, CategoryUpdate, NewCategory};
use crate::features::categories::store::{CategoryStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Catalog {
    categories: BTreeMap<CategoryId, Category>,
    next_id: i32,
}

impl Catalog {
    fn require_parent(&self, parent: Option<CategoryId>) -> StoreResult<()> {
        match parent {
            Some(parent) if !self.categories.contains_key(&parent) => {
                Err(StoreError::UnresolvedParent(parent))
            }
            _ => Ok(()),
        }
    }

    /// Walks up from `parent`; reaching `id` means the move would close a loop.
    fn would_cycle(&self, id: CategoryId, parent: CategoryId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == id {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            cursor = self.categories.get(&current).and_then(|c| c.parent_id);
        }
        false
    }
}

/// Process-local store, used when no database is configured and by tests
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `categories`; the next id handed out is one past
    /// the largest preloaded id.
    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let categories: BTreeMap<CategoryId, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        let next_id = categories
            .keys()
            .next_back()
            .map(|id| id.get() + 1)
            .unwrap_or(0);

        Self {
            catalog: RwLock::new(Catalog {
                categories,
                next_id,
            }),
        }
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.catalog.read().await.categories.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Category>> {
        Ok(self.catalog.read().await.categories.values().cloned().collect())
    }

    async fn insert(&self, category: NewCategory) -> StoreResult<Category> {
        let mut catalog = self.catalog.write().await;
        catalog.require_parent(category.parent_id)?;

        let id = CategoryId::new(catalog.next_id);
        catalog.next_id += 1;

        let category = category.into_category(id);
        catalog.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: CategoryId, update: CategoryUpdate) -> StoreResult<Category> {
        let mut catalog = self.catalog.write().await;
        if !catalog.categories.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        catalog.require_parent(update.parent_id)?;
        if let Some(parent) = update.parent_id {
            if catalog.would_cycle(id, parent) {
                return Err(StoreError::CyclicParent { id, parent });
            }
        }

        let category = catalog
            .categories
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        category.apply(update);
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> StoreResult<bool> {
        Ok(self.catalog.write().await.categories.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::features::categories::store::seed;

    fn new_category(name: &str, parent: Option<i32>) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            visible: true,
            header: None,
            image_path: None,
            parent_id: parent.map(CategoryId::new),
            created_at: NaiveDateTime::default(),
        }
    }

    fn update_of(category: &Category, parent: Option<i32>) -> CategoryUpdate {
        CategoryUpdate {
            name: category.name.clone(),
            visible: category.visible,
            header: category.header.clone(),
            image_path: category.image_path.clone(),
            parent_id: parent.map(CategoryId::new),
        }
    }

    #[tokio::test]
    async fn test_first_id_is_zero_and_ids_are_never_reused() {
        let store = InMemoryCategoryStore::new();

        let top = store.insert(new_category("Top", None)).await.unwrap();
        assert_eq!(top.id, CategoryId::new(0));

        let child = store.insert(new_category("Child", Some(0))).await.unwrap();
        assert_eq!(child.id, CategoryId::new(1));

        assert!(store.delete(child.id).await.unwrap());
        let next = store.insert(new_category("Next", Some(0))).await.unwrap();
        assert_eq!(next.id, CategoryId::new(2));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_parent() {
        let store = InMemoryCategoryStore::new();
        let err = store
            .insert(new_category("Orphan", Some(999)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnresolvedParent(id) if id == CategoryId::new(999)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_cycles() {
        let store = InMemoryCategoryStore::with_categories(seed::catalog());
        let bikes = store.get(CategoryId::new(1001)).await.unwrap().unwrap();

        // self-parent
        let err = store
            .update(bikes.id, update_of(&bikes, Some(1001)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CyclicParent { .. }));

        // 1007 Trek Mountain sits below 1004 Mountain Bikes below 1001 Bikes
        let err = store
            .update(bikes.id, update_of(&bikes, Some(1007)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CyclicParent { parent, .. } if parent == CategoryId::new(1007)));

        let unchanged = store.get(bikes.id).await.unwrap().unwrap();
        assert_eq!(unchanged.parent_id, Some(CategoryId::new(1000)));
    }

    #[tokio::test]
    async fn test_update_unknown_id_and_parent() {
        let store = InMemoryCategoryStore::with_categories(seed::catalog());
        let cars = store.get(CategoryId::new(1009)).await.unwrap().unwrap();

        let err = store
            .update(CategoryId::new(5000), update_of(&cars, None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store
            .update(cars.id, update_of(&cars, Some(4242)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnresolvedParent(_)));
    }

    #[tokio::test]
    async fn test_update_moves_subtree() {
        let store = InMemoryCategoryStore::with_categories(seed::catalog());
        let trucks = store.get(CategoryId::new(1010)).await.unwrap().unwrap();

        let moved = store
            .update(trucks.id, update_of(&trucks, Some(0)))
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(CategoryId::new(0)));
        assert_eq!(moved.created_at, trucks.created_at);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_was_removed() {
        let store = InMemoryCategoryStore::with_categories(seed::catalog());

        assert!(store.delete(CategoryId::new(1009)).await.unwrap());
        assert!(!store.delete(CategoryId::new(1009)).await.unwrap());
        assert!(!store.delete(CategoryId::new(999)).await.unwrap());

        // children keep the dangling reference
        let ford = store.get(CategoryId::new(1012)).await.unwrap().unwrap();
        assert_eq!(ford.parent_id, Some(CategoryId::new(1009)));
    }

    #[tokio::test]
    async fn test_seeded_store_lists_in_id_order_and_continues_after_max() {
        let store = InMemoryCategoryStore::with_categories(seed::catalog());
        let ids: Vec<i32> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id.get())
            .collect();
        assert_eq!(ids.len(), 21);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let created = store
            .insert(new_category("BMW", Some(1009)))
            .await
            .unwrap();
        assert_eq!(created.id, CategoryId::new(1020));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_serialize() {
        let store = Arc::new(InMemoryCategoryStore::with_categories(seed::catalog()));
        let cars = store.get(CategoryId::new(1009)).await.unwrap().unwrap();

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for i in 0..16 {
            let create_store = Arc::clone(&store);
            creates.push(tokio::spawn(async move {
                create_store
                    .insert(new_category(&format!("Brand {i}"), Some(1009)))
                    .await
            }));

            let update_store = Arc::clone(&store);
            let mut update = update_of(&cars, Some(1002));
            update.name = format!("Cars {i}");
            update.header = Some(format!("Cars {i}"));
            updates.push(tokio::spawn(async move {
                update_store.update(CategoryId::new(1009), update).await
            }));
        }

        let mut ids = HashSet::new();
        for handle in creates {
            let created = handle.await.unwrap().unwrap();
            assert!(ids.insert(created.id), "id handed out twice: {}", created.id);
        }
        for handle in updates {
            handle.await.unwrap().unwrap();
        }

        let expected: HashSet<CategoryId> = (1020..1036).map(CategoryId::new).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.list().await.unwrap().len(), 21 + 16);

        // one writer's fields, never a mix
        let cars = store.get(CategoryId::new(1009)).await.unwrap().unwrap();
        assert!(cars.name.starts_with("Cars "));
        assert_eq!(cars.header.as_deref(), Some(cars.name.as_str()));
        assert_eq!(cars.parent_id, Some(CategoryId::new(1002)));
    }
}
