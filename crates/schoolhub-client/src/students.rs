//! Student list and record access with fetch-all-after-write caching.

use schoolhub_models::{CreateStudentDto, Student, StudentListResponse, UpdateStudentDto};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::keys;

/// Query for `GET /students`. Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl StudentQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentStore {
    client: ApiClient,
    /// Last list query, replayed after every write.
    last_query: Arc<RwLock<StudentQuery>>,
}

impl StudentStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            last_query: Arc::new(RwLock::new(StudentQuery::default())),
        }
    }

    /// Lists students, served from the cache while fresh.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, query: &StudentQuery) -> Result<StudentListResponse, ClientError> {
        *self.last_query.write().await = query.clone();

        let key = keys::students::list(&keys::hash_filters(query));
        if let Some(cached) = self.client.cache().get(&key).await {
            return Ok(cached);
        }

        let list: StudentListResponse = self.client.get_with_query("/students", query).await?;
        self.client.cache().set(&key, &list).await?;
        debug!(total = list.total, "Students fetched");
        Ok(list)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Student>, ClientError> {
        Ok(self.fetch_all(&StudentQuery::search(term)).await?.students)
    }

    pub async fn get(&self, id: Uuid) -> Result<Student, ClientError> {
        let key = keys::students::by_id(&id);
        if let Some(cached) = self.client.cache().get(&key).await {
            return Ok(cached);
        }

        let student: Student = self.client.get(&format!("/students/{id}")).await?;
        self.client.cache().set(&key, &student).await?;
        Ok(student)
    }

    pub async fn get_by_student_id(&self, student_id: &str) -> Result<Student, ClientError> {
        let key = keys::students::by_student_id(student_id);
        if let Some(cached) = self.client.cache().get(&key).await {
            return Ok(cached);
        }

        let student: Student = self
            .client
            .get(&format!("/students/student-id/{student_id}"))
            .await?;
        self.client.cache().set(&key, &student).await?;
        Ok(student)
    }

    #[instrument(skip(self, dto))]
    pub async fn add(&self, dto: &CreateStudentDto) -> Result<Student, ClientError> {
        let student: Student = self.client.post("/students", dto).await?;
        self.after_write().await?;
        Ok(student)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: Uuid, dto: &UpdateStudentDto) -> Result<Student, ClientError> {
        let student: Student = self.client.put(&format!("/students/{id}"), dto).await?;
        self.after_write().await?;
        Ok(student)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<(), ClientError> {
        self.client.delete(&format!("/students/{id}")).await?;
        self.after_write().await?;
        Ok(())
    }

    async fn after_write(&self) -> Result<(), ClientError> {
        self.client.cache().invalidate_prefix(keys::students::PREFIX).await;
        let query = self.last_query.read().await.clone();
        self.fetch_all(&query).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_skips_unset_fields() {
        let query = StudentQuery::search("ສົມ");
        assert_eq!(serde_json::to_value(&query).unwrap(), serde_json::json!({"search": "ສົມ"}));
    }

    #[test]
    fn test_equal_queries_share_a_key() {
        let a = StudentQuery {
            gender: Some("F".into()),
            limit: Some(10),
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(
            keys::students::list(&keys::hash_filters(&a)),
            keys::students::list(&keys::hash_filters(&b))
        );
        assert_ne!(
            keys::hash_filters(&a),
            keys::hash_filters(&StudentQuery::default())
        );
    }
}
