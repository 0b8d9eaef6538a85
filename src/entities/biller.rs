use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{de_string_or_number, Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Biller {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    pub status: EntityStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBiller {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Name must not exceed 100 characters.")
    )]
    pub name: String,
    #[validate(
        email(message = "Invalid email format."),
        length(max = 150, message = "Email must not exceed 150 characters.")
    )]
    pub email: String,
    #[validate(length(max = 20, message = "Phone must not exceed 20 characters."))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Country must not exceed 100 characters."))]
    pub country: Option<String>,
    #[validate(length(max = 150, message = "Company name must not exceed 150 characters."))]
    pub company_name: Option<String>,
    pub status: EntityStatus,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBiller {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        custom(function = "not_blank", message = "Name is required."),
        length(max = 100, message = "Name must not exceed 100 characters.")
    )]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20, message = "Phone must not exceed 20 characters."))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Country must not exceed 100 characters."))]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 150, message = "Company name must not exceed 150 characters."))]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Entity for Biller {
    type Id = String;
    type Create = CreateBiller;
    type Update = UpdateBiller;

    const RESOURCE: Resource = Resource {
        collection: "/billers",
        member: "/users",
        items_key: "billers",
        status_casing: StatusCasing::Lower,
        label: "biller",
    };

    fn id(&self) -> String {
        self.id.clone()
    }

    fn status(&self) -> EntityStatus {
        self.status
    }
}
