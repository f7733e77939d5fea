//! Typed HTTP access to the API.
//!
//! Every call unwraps the `{success, data, message}` envelope. Failure
//! envelopes become [`ClientError::Api`] with the server's message.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::cache::ClientCache;
use crate::config::CacheConfig;
use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

/// Cloning shares the token and the cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: CacheConfig,
    token: Arc<RwLock<Option<String>>>,
    cache: ClientCache,
}

impl ApiClient {
    pub fn new(config: CacheConfig, cache: ClientCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: Arc::new(RwLock::new(None)),
            cache,
        }
    }

    pub fn cache(&self) -> &ClientCache {
        &self.cache
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.url(path));
        match self.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let req = self.request(Method::GET, path).await;
        self.send(req).await
    }

    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::GET, path).await.query(query);
        self.send(req).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).await.json(body);
        self.send(req).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, path).await.json(body);
        self.send(req).await
    }

    /// Deletes and returns the server's acknowledgement message.
    pub async fn delete(&self, path: &str) -> Result<String, ClientError> {
        let req = self.request(Method::DELETE, path).await;
        let bytes = self.send_raw(req).await?;
        let envelope: MessageEnvelope = serde_json::from_slice(&bytes)?;
        Ok(envelope.message.unwrap_or_default())
    }

    async fn send<T>(&self, req: RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.send_raw(req).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }

    #[instrument(skip_all)]
    async fn send_raw(&self, req: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "API response");

        if status.is_success() {
            Ok(bytes.to_vec())
        } else {
            Err(api_error(status, &bytes))
        }
    }
}

/// Builds [`ClientError::Api`] from a failure body, falling back to the
/// status reason when the body is not an envelope.
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<MessageEnvelope>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_api_error_uses_envelope_message() {
        let err = api_error(
            StatusCode::CONFLICT,
            br#"{"success":false,"message":"Student ID already exists"}"#,
        );
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Student ID already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_reason() {
        let err = api_error(StatusCode::BAD_GATEWAY, b"<html>");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_token_is_shared_between_clones() {
        let client = ApiClient::new(CacheConfig::default(), ClientCache::new(Duration::from_secs(1)));
        let other = client.clone();

        other.set_token(Some("abc".into())).await;
        assert_eq!(client.token().await.as_deref(), Some("abc"));
        assert!(client.is_authenticated().await);

        client.set_token(None).await;
        assert!(!other.is_authenticated().await);
    }
}
