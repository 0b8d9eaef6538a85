//! Endpoint bindings consumed by the list controller.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::entity::Entity;
use crate::error::Result;
use crate::page::PageEnvelope;
use crate::query::QueryState;

/// List/CRUD operations for one entity type.
#[async_trait]
pub trait EntityEndpoints: Send + Sync + 'static {
    type Entity: Entity;

    async fn list(&self, query: &QueryState) -> Result<PageEnvelope<Self::Entity>>;

    async fn fetch(&self, id: &<Self::Entity as Entity>::Id) -> Result<Self::Entity>;

    async fn create(&self, payload: &<Self::Entity as Entity>::Create) -> Result<Self::Entity>;

    async fn update(
        &self,
        id: &<Self::Entity as Entity>::Id,
        payload: &<Self::Entity as Entity>::Update,
    ) -> Result<Self::Entity>;

    /// Returns the server's confirmation message.
    async fn delete(&self, id: &<Self::Entity as Entity>::Id) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

/// REST binding driven by the entity's static [`Resource`](crate::entity::Resource).
#[derive(Debug, Clone)]
pub struct RestEndpoints<T> {
    client: ApiClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> RestEndpoints<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Entity> EntityEndpoints for RestEndpoints<T> {
    type Entity = T;

    async fn list(&self, query: &QueryState) -> Result<PageEnvelope<T>> {
        let resource = T::RESOURCE;
        let params = query.to_params(resource.status_casing);
        let body: Value = self.client.get(resource.collection_path(), &params).await?;
        PageEnvelope::from_value(body, resource.items_key)
    }

    async fn fetch(&self, id: &T::Id) -> Result<T> {
        self.client.get(&T::RESOURCE.item_path(id), &[]).await
    }

    async fn create(&self, payload: &T::Create) -> Result<T> {
        self.client
            .post(T::RESOURCE.collection_path(), payload)
            .await
    }

    async fn update(&self, id: &T::Id, payload: &T::Update) -> Result<T> {
        self.client.put(&T::RESOURCE.member_path(id), payload).await
    }

    async fn delete(&self, id: &T::Id) -> Result<String> {
        let resp: Option<MessageResponse> =
            self.client.delete(&T::RESOURCE.member_path(id)).await?;
        Ok(resp
            .map(|r| r.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("{} {id} deleted", T::RESOURCE.label)))
    }
}
