use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::not_blank;

/// List filter key scoping sub-categories to one parent category.
pub const CATEGORY_FILTER: &str = "categoryId";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    pub category_id: i64,
    /// Denormalised; may lag behind a renamed category until the next fetch.
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubCategory {
    #[validate(custom(function = "not_blank", message = "Sub Category Name is required."))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Category Code is required."))]
    pub code: String,
    #[validate(range(min = 1, message = "Category is required."))]
    pub category_id: i64,
    pub status: EntityStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Sub Category Name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Category Code is required."))]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Category is required."))]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Entity for SubCategory {
    type Id = i64;
    type Create = CreateSubCategory;
    type Update = UpdateSubCategory;

    const RESOURCE: Resource = Resource {
        collection: "/subcategories",
        member: "/subcategories",
        items_key: "subCategories",
        status_casing: StatusCasing::Lower,
        label: "sub-category",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> EntityStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_must_be_chosen() {
        let payload = CreateSubCategory {
            name: "Laptops".into(),
            code: "LAP".into(),
            category_id: 0,
            ..CreateSubCategory::default()
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("category_id"));
    }

    #[test]
    fn payload_uses_camel_case_keys() {
        let payload = CreateSubCategory {
            name: "Laptops".into(),
            code: "LAP".into(),
            category_id: 2,
            ..CreateSubCategory::default()
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["categoryId"], 2);
        assert_eq!(body["status"], "active");
    }

    #[test]
    fn update_rejects_whitespace_name_and_code() {
        let payload = UpdateSubCategory {
            name: Some("  ".into()),
            code: Some(" ".into()),
            ..UpdateSubCategory::default()
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("code"));
    }
}
