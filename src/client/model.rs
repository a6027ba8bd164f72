use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Category as the client sees it.
///
/// Every field is optional so a partially filled value can be sent (the
/// provider rejects what it needs). `parent` is always an object on the
/// client side: a bare id in a list response becomes a stub holding only
/// that id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_parent",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Box<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            visible: Some(true),
            ..Default::default()
        }
    }

    /// Parent stub: only the id is known
    pub fn stub(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }

    pub fn with_parent(mut self, parent: Category) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    pub fn parent_id(&self) -> Option<i32> {
        self.parent.as_ref().and_then(|p| p.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParentRepr {
    Id(i32),
    Object(Box<Category>),
}

fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<Box<Category>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<ParentRepr>::deserialize(deserializer)?.map(|parent| match parent {
            ParentRepr::Id(id) => Box::new(Category::stub(id)),
            ParentRepr::Object(category) => category,
        }),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_parent_id_becomes_stub() {
        let category: Category = serde_json::from_value(json!({
            "id": 1000,
            "name": "Transportation",
            "visible": true,
            "parent": 0
        }))
        .unwrap();

        assert_eq!(category.parent.as_deref(), Some(&Category::stub(0)));
        assert_eq!(category.parent_id(), Some(0));
    }

    #[test]
    fn test_nested_and_null_parents() {
        let category: Category = serde_json::from_value(json!({
            "id": 1009,
            "name": "Cars",
            "parent": {"id": 1002, "name": "Automobiles", "parent": {"id": 1000, "parent": null}},
            "createdAt": "2002-01-01T00:00:00"
        }))
        .unwrap();

        let parent = category.parent.as_deref().unwrap();
        assert_eq!(parent.name.as_deref(), Some("Automobiles"));
        assert_eq!(parent.parent_id(), Some(1000));
        assert!(parent.parent.as_ref().unwrap().parent.is_none());
        assert_eq!(
            category.created_at.unwrap().to_string(),
            "2002-01-01 00:00:00"
        );
    }

    #[test]
    fn test_serialization_embeds_parent_and_omits_unset_fields() {
        let category = Category::new("BMW")
            .with_header("header")
            .with_parent(Category::stub(1009));

        assert_eq!(
            serde_json::to_value(&category).unwrap(),
            json!({"name": "BMW", "visible": true, "header": "header", "parent": {"id": 1009}})
        );
    }
}
