//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::not_blank;

pub use schoolhub_auth::{Claims, Role};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, message = "username is required"),
        custom(function = "not_blank", message = "username is required")
    )]
    #[schema(example = "admin")]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// The authenticated user as returned by login and `/auth/check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AuthUserInfo {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: AuthUserInfo,
    pub token: String,
}

/// Account creation through `/auth/register`.
///
/// `role` is a string so an unknown value can be reported as a plain 400.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[schema(example = "staff")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_rejects_empty_fields() {
        let req = LoginRequest {
            username: String::new(),
            password: "secret".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_login_request_rejects_whitespace_username() {
        let req = LoginRequest {
            username: "  ".to_string(),
            password: "secret".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let field = &errors.field_errors()["username"];
        assert_eq!(field[0].message.as_deref(), Some("username is required"));
    }

    #[test]
    fn test_register_response_uses_camel_case() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(RegisterResponse { user_id: id }).unwrap();
        assert_eq!(json["userId"], id.to_string());
    }
}
