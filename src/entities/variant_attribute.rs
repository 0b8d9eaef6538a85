use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::{non_blank_values, not_blank};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantAttribute {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantAttribute {
    #[validate(custom(function = "not_blank", message = "Variant name is required."))]
    pub name: String,
    #[validate(custom(function = "non_blank_values"))]
    pub values: Vec<String>,
    pub image_url: Option<String>,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariantAttribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Variant name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_blank_values"))]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

/// Split comma-separated form input (`"S, M ,L"`) into trimmed values.
/// Empty segments are kept so validation can reject them.
pub fn parse_values(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(',').map(|v| v.trim().to_string()).collect()
}

impl Entity for VariantAttribute {
    type Id = i64;
    type Create = CreateVariantAttribute;
    type Update = UpdateVariantAttribute;

    const RESOURCE: Resource = Resource {
        collection: "/variant-attributes",
        member: "/variant-attributes",
        items_key: "variantAttributes",
        status_casing: StatusCasing::Lower,
        label: "variant attribute",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> EntityStatus {
        self.status
    }
}
