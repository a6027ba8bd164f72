use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::features::categories::models::{Category, CategoryId, CategoryUpdate, NewCategory};
use crate::features::categories::store::{CategoryStore, StoreError, StoreResult};

const SELECT_COLUMNS: &str =
    "SELECT id, parent_id, name, visible, header, image_path, created_at FROM categories";

/// Database row for categories
#[derive(Debug, Clone, FromRow)]
struct CategoryRow {
    id: i32,
    parent_id: Option<i32>,
    name: String,
    visible: bool,
    header: Option<String>,
    image_path: Option<String>,
    created_at: NaiveDateTime,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            visible: row.visible,
            header: row.header,
            image_path: row.image_path,
            parent_id: row.parent_id.map(CategoryId::new),
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed store. Ids come from an identity column, so a deleted
/// id is never handed out again.
#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert `categories` with their own ids, skipping any already present,
    /// then move the identity sequence past the largest id.
    pub async fn seed(&self, categories: &[Category]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for category in categories {
            sqlx::query(
                r#"
                INSERT INTO categories (id, parent_id, name, visible, header, image_path, created_at)
                OVERRIDING SYSTEM VALUE
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(category.id.get())
            .bind(category.parent_id.map(CategoryId::get))
            .bind(&category.name)
            .bind(category.visible)
            .bind(&category.header)
            .bind(&category.image_path)
            .bind(category.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('categories', 'id'),
                (SELECT COALESCE(MAX(id), 0) FROM categories)
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!("Seeded {} categories", categories.len());
        Ok(())
    }

    /// Share-locks the parent row so it cannot be deleted before commit.
    async fn lock_parent(
        tx: &mut Transaction<'_, Postgres>,
        parent: Option<CategoryId>,
    ) -> StoreResult<()> {
        let Some(parent) = parent else {
            return Ok(());
        };

        let found: Option<i32> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR SHARE")
                .bind(parent.get())
                .fetch_optional(&mut **tx)
                .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(StoreError::UnresolvedParent(parent)),
        }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn get(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    async fn list(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn insert(&self, category: NewCategory) -> StoreResult<Category> {
        let mut tx = self.pool.begin().await?;
        Self::lock_parent(&mut tx, category.parent_id).await?;

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (parent_id, name, visible, header, image_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, parent_id, name, visible, header, image_path, created_at
            "#,
        )
        .bind(category.parent_id.map(CategoryId::get))
        .bind(&category.name)
        .bind(category.visible)
        .bind(&category.header)
        .bind(&category.image_path)
        .bind(category.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn update(&self, id: CategoryId, update: CategoryUpdate) -> StoreResult<Category> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i32> =
            sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_none() {
            return Err(StoreError::NotFound(id));
        }

        Self::lock_parent(&mut tx, update.parent_id).await?;

        if let Some(parent) = update.parent_id {
            // Is `id` the new parent or one of its ancestors?
            let cyclic: bool = sqlx::query_scalar(
                r#"
                WITH RECURSIVE ancestors AS (
                    SELECT id, parent_id FROM categories WHERE id = $1
                    UNION
                    SELECT c.id, c.parent_id FROM categories c
                    JOIN ancestors a ON c.id = a.parent_id
                )
                SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
                "#,
            )
            .bind(parent.get())
            .bind(id.get())
            .fetch_one(&mut *tx)
            .await?;

            if cyclic {
                return Err(StoreError::CyclicParent { id, parent });
            }
        }

        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET parent_id = $2, name = $3, visible = $4, header = $5, image_path = $6
            WHERE id = $1
            RETURNING id, parent_id, name, visible, header, image_path, created_at
            "#,
        )
        .bind(id.get())
        .bind(update.parent_id.map(CategoryId::get))
        .bind(&update.name)
        .bind(update.visible)
        .bind(&update.header)
        .bind(&update.image_path)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete(&self, id: CategoryId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::store::seed;

    fn new_category(name: &str, parent: Option<i32>) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            visible: true,
            header: None,
            image_path: None,
            parent_id: parent.map(CategoryId::new),
            created_at: seed::seeded_at(),
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

    async fn seeded_store(pool: PgPool) -> PgCategoryStore {
        let store = PgCategoryStore::new(pool);
        store.seed(&seed::catalog()).await.unwrap();
        store
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_first_id_is_zero_and_deleted_ids_are_not_reused(pool: PgPool) {
        let store = PgCategoryStore::new(pool);

        let top = store.insert(new_category("Top", None)).await.unwrap();
        assert_eq!(top.id, CategoryId::new(0));

        let child = store.insert(new_category("Child", Some(0))).await.unwrap();
        assert_eq!(child.id, CategoryId::new(1));

        assert!(store.delete(child.id).await.unwrap());
        assert!(!store.delete(child.id).await.unwrap());

        let next = store.insert(new_category("Next", Some(0))).await.unwrap();
        assert_eq!(next.id, CategoryId::new(2));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_seed_moves_sequence_past_catalog(pool: PgPool) {
        let store = seeded_store(pool).await;
        // seeding twice is a no-op
        store.seed(&seed::catalog()).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 21);
        assert_eq!(all, seed::catalog());

        let created = store
            .insert(new_category("BMW", Some(1009)))
            .await
            .unwrap();
        assert_eq!(created.id, CategoryId::new(1020));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_unknown_parent_is_rejected(pool: PgPool) {
        let store = seeded_store(pool).await;

        let err = store
            .insert(new_category("Orphan", Some(999)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnresolvedParent(id) if id == CategoryId::new(999)));

        let cars = store.get(CategoryId::new(1009)).await.unwrap().unwrap();
        let err = store
            .update(cars.id, update_of(&cars, Some(4242)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnresolvedParent(_)));
        assert_eq!(store.list().await.unwrap().len(), 21);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_self_and_descendant_parents_are_rejected(pool: PgPool) {
        let store = seeded_store(pool).await;
        let bikes = store.get(CategoryId::new(1001)).await.unwrap().unwrap();

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

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_update_unknown_id_and_dangling_children(pool: PgPool) {
        let store = seeded_store(pool).await;
        let cars = store.get(CategoryId::new(1009)).await.unwrap().unwrap();

        let err = store
            .update(CategoryId::new(5000), update_of(&cars, None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let moved = store
            .update(cars.id, update_of(&cars, Some(0)))
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(CategoryId::new(0)));
        assert_eq!(moved.created_at, cars.created_at);

        assert!(store.delete(cars.id).await.unwrap());
        let ford = store.get(CategoryId::new(1012)).await.unwrap().unwrap();
        assert_eq!(ford.parent_id, Some(CategoryId::new(1009)));
    }
}
