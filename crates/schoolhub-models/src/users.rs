//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use schoolhub_auth::Role;

use crate::auth::AuthUserInfo;

/// A user account without its password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for AuthUserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
        }
    }
}

/// Row used by login; never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 50, message = "username cannot be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl UpdateUserDto {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.name.is_none()
            && self.role.is_none()
            && self.active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_role_defaults_to_staff() {
        let dto: CreateUserDto =
            serde_json::from_str(r#"{"username":"noy","password":"secret1","name":"Noy"}"#)
                .unwrap();
        assert_eq!(dto.role, Role::Staff);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let dto: CreateUserDto =
            serde_json::from_str(r#"{"username":"noy","password":"123","name":"Noy"}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateUserDto::default().is_empty());
        let dto = UpdateUserDto {
            active: Some(false),
            ..Default::default()
        };
        assert!(!dto.is_empty());
    }
}
