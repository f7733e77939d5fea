//! Access token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::role::Role;

/// Claims embedded in an access token.
///
/// Identity and role are enough for every authorization decision, so
/// protected routes never look the user up.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// The subject parsed as a user id, if it is a valid UUID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "8a6e0804-2bd0-4672-b79d-d97027f9071a".to_string(),
            username: "somsak".to_string(),
            role,
            exp: 1234567890,
            iat: 1234567800,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&claims(Role::Staff)).unwrap();
        assert!(serialized.contains(r#""username":"somsak""#));
        assert!(serialized.contains(r#""role":"staff""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"abc","username":"noy","role":"teacher","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.exp, 9999999999);
        assert!(claims.user_id().is_none());
    }

    #[test]
    fn test_user_id_parses_subject() {
        assert!(claims(Role::Admin).user_id().is_some());
    }

    #[test]
    fn test_has_any_role() {
        let c = claims(Role::Teacher);
        assert!(c.has_any_role(&[Role::Admin, Role::Teacher]));
        assert!(!c.has_any_role(&[Role::Admin, Role::Staff]));
        assert!(!c.has_any_role(&[]));
    }
}
