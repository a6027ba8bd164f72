use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an untrusted integer cannot be a category id
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("category id must be zero or greater, got {0}")]
pub struct InvalidCategoryId(pub i32);

/// Identifier assigned by the store. The root of the seed catalog is `0`, so
/// zero is a valid id; negative values are rejected when deserialized.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "i32", into = "i32")]
pub struct CategoryId(i32);

impl CategoryId {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw `i32` backing this identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for CategoryId {
    type Error = InvalidCategoryId;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(InvalidCategoryId(value))
        }
    }
}

impl From<CategoryId> for i32 {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

/// Stored category record. The parent is kept as a bare id; expanding it is
/// the service's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub visible: bool,
    pub header: Option<String>,
    pub image_path: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub created_at: NaiveDateTime,
}

impl Category {
    /// Replace every mutable field; `id` and `created_at` stay untouched.
    pub fn apply(&mut self, update: CategoryUpdate) {
        self.name = update.name;
        self.visible = update.visible;
        self.header = update.header;
        self.image_path = update.image_path;
        self.parent_id = update.parent_id;
    }
}

/// Data required to insert a new [`Category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub visible: bool,
    pub header: Option<String>,
    pub image_path: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub created_at: NaiveDateTime,
}

impl NewCategory {
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            visible: self.visible,
            header: self.header,
            image_path: self.image_path,
            parent_id: self.parent_id,
            created_at: self.created_at,
        }
    }
}

/// Replacement values for an existing [`Category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: String,
    pub visible: bool,
    pub header: Option<String>,
    pub image_path: Option<String>,
    pub parent_id: Option<CategoryId>,
}

impl CategoryUpdate {
    pub fn into_new(self, created_at: NaiveDateTime) -> NewCategory {
        NewCategory {
            name: self.name,
            visible: self.visible,
            header: self.header,
            image_path: self.image_path,
            parent_id: self.parent_id,
            created_at,
        }
    }
}

/// A category together with its resolved ancestors, nearest parent first and
/// the root last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLineage {
    pub category: Category,
    pub ancestors: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_id_accepts_zero_and_rejects_negative() {
        let root: CategoryId = serde_json::from_str("0").unwrap();
        assert_eq!(root.get(), 0);

        let err = serde_json::from_str::<CategoryId>("-4").unwrap_err();
        assert!(err.to_string().contains("must be zero or greater"));
        assert_eq!(CategoryId::try_from(-1), Err(InvalidCategoryId(-1)));
    }

    #[test]
    fn test_category_id_serializes_as_bare_integer() {
        assert_eq!(serde_json::to_string(&CategoryId::new(1015)).unwrap(), "1015");
    }

    #[test]
    fn test_apply_keeps_id_and_created_at() {
        let created_at = NaiveDateTime::default();
        let mut category = NewCategory {
            name: "Cars".to_string(),
            visible: true,
            header: None,
            image_path: None,
            parent_id: None,
            created_at,
        }
        .into_category(CategoryId::new(3));

        category.apply(CategoryUpdate {
            name: "Trucks".to_string(),
            visible: false,
            header: Some("header".to_string()),
            image_path: Some("n/a".to_string()),
            parent_id: Some(CategoryId::new(1)),
        });

        assert_eq!(category.id, CategoryId::new(3));
        assert_eq!(category.created_at, created_at);
        assert_eq!(category.name, "Trucks");
        assert!(!category.visible);
        assert_eq!(category.parent_id, Some(CategoryId::new(1)));
    }
}
