use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::{no_whitespace, not_blank};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(custom(function = "not_blank", message = "Category Name is required."))]
    pub name: String,
    #[validate(
        custom(function = "not_blank", message = "Category Slug is required."),
        custom(function = "no_whitespace", message = "Category Slug cannot contain spaces.")
    )]
    pub slug: String,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Category Name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "not_blank", message = "Category Slug is required."),
        custom(function = "no_whitespace", message = "Category Slug cannot contain spaces.")
    )]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl Entity for Category {
    type Id = i64;
    type Create = CreateCategory;
    type Update = UpdateCategory;

    const RESOURCE: Resource = Resource {
        collection: "/categories",
        member: "/categories",
        items_key: "categories",
        status_casing: StatusCasing::Lower,
        label: "category",
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
    use crate::validation::field_messages;

    #[test]
    fn slug_with_spaces_is_rejected_on_create_and_update() {
        let create = CreateCategory {
            name: "Computers".into(),
            slug: "home office".into(),
            status: EntityStatus::Active,
        };
        assert_eq!(
            field_messages(&create.validate().unwrap_err()),
            vec![(
                "slug".to_string(),
                "Category Slug cannot contain spaces.".to_string()
            )]
        );

        let update = UpdateCategory {
            slug: Some("home office".into()),
            ..UpdateCategory::default()
        };
        assert!(update.validate().is_err());

        let ok = UpdateCategory {
            slug: Some("home-office".into()),
            ..UpdateCategory::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn blank_name_is_required() {
        let create = CreateCategory {
            name: "".into(),
            slug: "computers".into(),
            status: EntityStatus::Active,
        };
        let errors = create.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn update_rejects_whitespace_name_and_slug() {
        let payload = UpdateCategory {
            name: Some("   ".into()),
            slug: Some(" ".into()),
            status: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("slug"));
    }
}
