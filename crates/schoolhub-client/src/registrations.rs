//! Registration access with fetch-all-after-write caching.
//!
//! Creating a registration can create its student, so every write here also
//! drops the cached student lists.

use schoolhub_models::{
    CreateRegistrationDto, NextIdResponse, RegistrationListResponse, RegistrationView,
    UpdateRegistrationDto,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::keys;

/// Query for `GET /registrations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct RegistrationStore {
    client: ApiClient,
    last_query: Arc<RwLock<RegistrationQuery>>,
}

impl RegistrationStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            last_query: Arc::new(RwLock::new(RegistrationQuery::default())),
        }
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(
        &self,
        query: &RegistrationQuery,
    ) -> Result<RegistrationListResponse, ClientError> {
        *self.last_query.write().await = query.clone();

        let key = keys::registrations::list(&keys::hash_filters(query));
        if let Some(cached) = self.client.cache().get(&key).await {
            return Ok(cached);
        }

        let list: RegistrationListResponse =
            self.client.get_with_query("/registrations", query).await?;
        self.client.cache().set(&key, &list).await?;
        debug!(total = list.total, "Registrations fetched");
        Ok(list)
    }

    pub async fn get(&self, id: &str) -> Result<RegistrationView, ClientError> {
        let key = keys::registrations::by_id(id);
        if let Some(cached) = self.client.cache().get(&key).await {
            return Ok(cached);
        }

        let registration: RegistrationView =
            self.client.get(&format!("/registrations/{id}")).await?;
        self.client.cache().set(&key, &registration).await?;
        Ok(registration)
    }

    /// Preview of the next invoice id. Never cached.
    pub async fn current_id(&self) -> Result<String, ClientError> {
        let next: NextIdResponse = self.client.get("/registrations/currentId").await?;
        Ok(next.id)
    }

    #[instrument(skip(self, dto), fields(student_id = %dto.student_id))]
    pub async fn create(&self, dto: &CreateRegistrationDto) -> Result<RegistrationView, ClientError> {
        let registration: RegistrationView = self.client.post("/registrations", dto).await?;
        self.after_write().await?;
        Ok(registration)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        id: &str,
        dto: &UpdateRegistrationDto,
    ) -> Result<RegistrationView, ClientError> {
        let registration: RegistrationView =
            self.client.put(&format!("/registrations/{id}"), dto).await?;
        self.after_write().await?;
        Ok(registration)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete(&format!("/registrations/{id}")).await?;
        self.after_write().await?;
        Ok(())
    }

    async fn after_write(&self) -> Result<(), ClientError> {
        let cache = self.client.cache();
        cache.invalidate_prefix(keys::registrations::PREFIX).await;
        cache.invalidate_prefix(keys::students::PREFIX).await;

        let query = self.last_query.read().await.clone();
        self.fetch_all(&query).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serializes_paid_flag() {
        let query = RegistrationQuery {
            school_year: Some("2024".into()),
            paid: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({"school_year": "2024", "paid": false})
        );
    }
}
