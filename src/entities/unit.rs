use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, EntityStatus, Resource, StatusCasing};
use crate::validation::not_blank;

/// Unit of measure (kilogram, piece, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub no_of_products: i64,
    pub status: EntityStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnit {
    #[validate(custom(function = "not_blank", message = "Unit Name is required."))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Short Name is required."))]
    pub short_name: String,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnit {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Unit Name is required."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Short Name is required."))]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntityStatus>,
}

impl Entity for Unit {
    type Id = i64;
    type Create = CreateUnit;
    type Update = UpdateUnit;

    const RESOURCE: Resource = Resource {
        collection: "/units",
        member: "/units",
        items_key: "units",
        status_casing: StatusCasing::Upper,
        label: "unit",
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
    fn both_names_are_required() {
        let payload = CreateUnit::default();
        assert_eq!(
            field_messages(&payload.validate().unwrap_err()),
            vec![
                ("name".to_string(), "Unit Name is required.".to_string()),
                ("short_name".to_string(), "Short Name is required.".to_string()),
            ]
        );
    }

    #[test]
    fn update_rejects_whitespace_names() {
        let payload = UpdateUnit {
            name: Some(" ".into()),
            short_name: Some("\t".into()),
            status: None,
        };
        assert_eq!(
            field_messages(&payload.validate().unwrap_err()),
            vec![
                ("name".to_string(), "Unit Name is required.".to_string()),
                ("short_name".to_string(), "Short Name is required.".to_string()),
            ]
        );
    }
}
