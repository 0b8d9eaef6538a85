use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub total_products: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub qty: i64,
    /// May be `deleted`, which is terminal.
    pub status: EntityStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
    pub user_id: i64,
    #[serde(default)]
    pub managing_user_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWarehouse {
    #[validate(custom(function = "not_blank", message = "Warehouse Name is required."))]
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(range(min = 1, message = "User ID must be a valid number greater than 0."))]
    pub user_id: i64,
    pub status: EntityStatus,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWarehouse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Warehouse Name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "User ID must be a valid number greater than 0."))]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Entity for Warehouse {
    type Id = i64;
    type Create = CreateWarehouse;
    type Update = UpdateWarehouse;

    const RESOURCE: Resource = Resource {
        collection: "/warehouses",
        member: "/warehouses",
        items_key: "warehouses",
        status_casing: StatusCasing::Lower,
        label: "warehouse",
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
    use serde_json::json;

    #[test]
    fn decodes_deleted_status() {
        let row: Warehouse = serde_json::from_value(json!({
            "id": 4,
            "code": "WH004",
            "name": "Overflow",
            "contactPerson": null,
            "phone": null,
            "totalProducts": 0,
            "stock": 0,
            "qty": 0,
            "status": "deleted",
            "imageUrl": null,
            "createdOn": "2024-01-01",
            "userId": 2,
            "managingUserName": "Chris"
        }))
        .unwrap();
        assert_eq!(row.status(), EntityStatus::Deleted);
        assert_eq!(row.id(), 4);
    }

    #[test]
    fn user_id_must_be_positive() {
        let payload = CreateWarehouse {
            name: "Main".into(),
            user_id: 0,
            ..CreateWarehouse::default()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_id"));
    }

    #[test]
    fn update_rejects_whitespace_name() {
        let payload = UpdateWarehouse {
            name: Some("   ".into()),
            ..UpdateWarehouse::default()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
