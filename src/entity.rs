//! Entity bindings: how each back-office record type maps onto the REST API.

use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Lifecycle status of a record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    #[serde(alias = "ACTIVE", alias = "Active")]
    Active,
    #[serde(alias = "INACTIVE", alias = "Inactive")]
    Inactive,
    /// Terminal state; only warehouses expose it.
    #[serde(alias = "DELETED", alias = "Deleted")]
    Deleted,
}

impl EntityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Deleted => "deleted",
        }
    }
}

/// Casing the list endpoint expects for the `status` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCasing {
    Lower,
    Upper,
}

impl StatusCasing {
    pub fn encode(self, status: EntityStatus) -> String {
        match self {
            Self::Lower => status.as_str().to_string(),
            Self::Upper => status.as_str().to_ascii_uppercase(),
        }
    }
}

/// Static description of one REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Collection path for list/create/get, e.g. `/customers`.
    pub collection: &'static str,
    /// Path prefix for update/delete. Person-like records share `/users`.
    pub member: &'static str,
    /// Key holding the row array inside the list envelope.
    pub items_key: &'static str,
    pub status_casing: StatusCasing,
    /// Human-readable singular name for logs and messages.
    pub label: &'static str,
}

impl Resource {
    pub fn collection_path(&self) -> &'static str {
        self.collection
    }

    pub fn item_path(&self, id: &impl Display) -> String {
        format!("{}/{id}", self.collection)
    }

    pub fn member_path(&self, id: &impl Display) -> String {
        format!("{}/{id}", self.member)
    }
}

/// A back-office record type managed through a list page.
pub trait Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type Id: Display + Debug + Clone + PartialEq + Send + Sync + 'static;
    type Create: Serialize + Validate + Debug + Send + Sync;
    type Update: Serialize + Validate + Debug + Send + Sync;

    const RESOURCE: Resource;

    fn id(&self) -> Self::Id;

    fn status(&self) -> EntityStatus;
}

/// Accept either a JSON string or number and keep it as a string.
pub(crate) fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_deserializes_either_casing() {
        let upper: EntityStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        let lower: EntityStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(upper, EntityStatus::Active);
        assert_eq!(lower, EntityStatus::Inactive);
        assert_eq!(serde_json::to_string(&EntityStatus::Deleted).unwrap(), "\"deleted\"");
    }

    #[test]
    fn casing_encodes_per_endpoint() {
        assert_eq!(StatusCasing::Upper.encode(EntityStatus::Inactive), "INACTIVE");
        assert_eq!(StatusCasing::Lower.encode(EntityStatus::Deleted), "deleted");
    }

    #[test]
    fn resource_paths() {
        let resource = Resource {
            collection: "/customers",
            member: "/users",
            items_key: "customers",
            status_casing: StatusCasing::Upper,
            label: "customer",
        };
        assert_eq!(resource.item_path(&"c-1"), "/customers/c-1");
        assert_eq!(resource.member_path(&"c-1"), "/users/c-1");
    }
}
