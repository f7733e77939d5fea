use crate::env_or;

/// Signing configuration for access tokens.
///
/// - `JWT_SECRET`: HMAC secret
/// - `JWT_ACCESS_EXPIRY`: lifetime in seconds (default one day)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", 86_400),
        }
    }
}
