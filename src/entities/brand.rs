use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrand {
    #[validate(custom(function = "not_blank", message = "Brand Name is required."))]
    pub name: String,
    pub image_url: Option<String>,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrand {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Brand Name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl Entity for Brand {
    type Id = i64;
    type Create = CreateBrand;
    type Update = UpdateBrand;

    const RESOURCE: Resource = Resource {
        collection: "/brands",
        member: "/brands",
        items_key: "brands",
        status_casing: StatusCasing::Upper,
        label: "brand",
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
    fn blank_names_are_rejected_on_create_and_update() {
        let create = CreateBrand {
            name: "  ".into(),
            ..CreateBrand::default()
        };
        assert!(create.validate().is_err());

        let update = UpdateBrand {
            name: Some("  ".into()),
            ..UpdateBrand::default()
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let status_only = UpdateBrand {
            status: Some(EntityStatus::Inactive),
            ..UpdateBrand::default()
        };
        assert!(status_only.validate().is_ok());
    }
}
