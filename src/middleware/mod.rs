//! Authentication and authorization.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor (bearer token → claims)
//! - [`role`]: role allow-lists as layers and extractors
//!
//! ```ignore
//! // any valid token
//! async fn list(auth_user: AuthUser) -> Result<Json<...>, AppError> { ... }
//!
//! // admin only
//! async fn remove(RequireAdmin(_): RequireAdmin) -> Result<..., AppError> { ... }
//! ```

pub mod auth;
pub mod role;
