use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub warehouse_id: i64,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    pub user_id: i64,
    #[serde(default)]
    pub total_products: i64,
    #[serde(default)]
    pub total_stock: i64,
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStore {
    #[validate(custom(function = "not_blank", message = "Store Name is required."))]
    pub name: String,
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(custom(function = "not_blank", message = "Address is required."))]
    pub address: String,
    #[validate(custom(function = "not_blank", message = "City is required."))]
    pub city: String,
    #[validate(custom(function = "not_blank", message = "Country is required."))]
    pub country: String,
    #[validate(range(min = 1, message = "Warehouse ID must be a valid number greater than 0."))]
    pub warehouse_id: i64,
    #[validate(range(min = 1, message = "User ID must be a valid number greater than 0."))]
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStore {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Store Name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format."))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Address is required."))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "City is required."))]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Country is required."))]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Warehouse ID must be a valid number greater than 0."))]
    pub warehouse_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "User ID must be a valid number greater than 0."))]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl Entity for Store {
    type Id = i64;
    type Create = CreateStore;
    type Update = UpdateStore;

    const RESOURCE: Resource = Resource {
        collection: "/stores",
        member: "/stores",
        items_key: "stores",
        status_casing: StatusCasing::Upper,
        label: "store",
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

    fn valid() -> CreateStore {
        CreateStore {
            name: "Downtown".into(),
            email: "downtown@pos.test".into(),
            phone: None,
            address: "1 Main St".into(),
            city: "Hanoi".into(),
            country: "Vietnam".into(),
            warehouse_id: 3,
            user_id: 1,
        }
    }

    #[test]
    fn valid_store_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn reports_each_failing_field_with_its_message() {
        let payload = CreateStore {
            name: " ".into(),
            email: "downtown".into(),
            warehouse_id: 0,
            ..valid()
        };
        let messages = field_messages(&payload.validate().unwrap_err());
        assert_eq!(
            messages,
            vec![
                ("email".to_string(), "Invalid email format.".to_string()),
                ("name".to_string(), "Store Name is required.".to_string()),
                (
                    "warehouse_id".to_string(),
                    "Warehouse ID must be a valid number greater than 0.".to_string()
                ),
            ]
        );
    }

    #[test]
    fn update_rejects_whitespace_required_fields() {
        let payload = UpdateStore {
            name: Some(" ".into()),
            address: Some(" ".into()),
            city: Some("".into()),
            country: Some("  ".into()),
            ..UpdateStore::default()
        };
        let fields: Vec<String> = field_messages(&payload.validate().unwrap_err())
            .into_iter()
            .map(|(field, _)| field)
            .collect();
        assert_eq!(fields, vec!["address", "city", "country", "name"]);
    }
}
