//! Login state.
//!
//! The token lives on the [`ApiClient`]; the signed-in user is cached under
//! [`keys::session::USER`].

use schoolhub_auth::Role;
use schoolhub_models::{AuthUserInfo, LoginResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::keys;

#[derive(Debug, Clone)]
pub struct Session {
    client: ApiClient,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Signs in and remembers the token and user.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthUserInfo, ClientError> {
        let response: LoginResponse = self
            .client
            .post("/auth/login", &json!({ "username": username, "password": password }))
            .await?;

        self.client.set_token(Some(response.token)).await;
        self.client.cache().set(keys::session::USER, &response.user).await?;

        info!(user_id = %response.user.id, role = %response.user.role, "Signed in");
        Ok(response.user)
    }

    /// Forgets the token and every cached response.
    pub async fn logout(&self) {
        self.client.set_token(None).await;
        self.client.cache().clear().await;
    }

    /// Reloads the user from `/auth/check`. A rejected token ends the session.
    pub async fn fetch_current_user(&self) -> Result<AuthUserInfo, ClientError> {
        if !self.client.is_authenticated().await {
            return Err(ClientError::NotAuthenticated);
        }

        match self.client.get::<AuthUserInfo>("/auth/check").await {
            Ok(user) => {
                self.client.cache().set(keys::session::USER, &user).await?;
                Ok(user)
            }
            Err(ClientError::Api { status: 401, .. }) => {
                self.logout().await;
                Err(ClientError::NotAuthenticated)
            }
            Err(e) => Err(e),
        }
    }

    /// The cached user, refreshed from the API once the cache entry expires.
    pub async fn current_user(&self) -> Option<AuthUserInfo> {
        if let Some(user) = self.client.cache().get(keys::session::USER).await {
            return Some(user);
        }
        self.fetch_current_user().await.ok()
    }

    pub async fn has_role(&self, role: Role) -> bool {
        self.current_user().await.is_some_and(|user| user.role == role)
    }

    pub async fn is_admin(&self) -> bool {
        self.has_role(Role::Admin).await
    }
}
