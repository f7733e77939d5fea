//! Role-based authorization.
//!
//! Two styles:
//! 1. Layers built with [`require_roles`] (`require_admin`, `require_authenticated`)
//!    for routers where every route shares one allow-list
//! 2. Extractors ([`RequireAdmin`], [`RequireAdminOrStaff`]) for routers that
//!    mix read and write permissions

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use schoolhub_auth::Role;
use schoolhub_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects with 403 unless the user's role is in `allowed`.
pub fn check_any_role(auth_user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if auth_user.has_any_role(allowed) {
        return Ok(());
    }

    tracing::warn!(
        user = %auth_user.username(),
        role = %auth_user.role(),
        "Access denied"
    );
    Err(AppError::forbidden(
        "Access denied. You do not have permission to perform this action",
    ))
}

/// Authenticates the request and checks the role allow-list.
///
/// The resolved [`AuthUser`] is stored in the request extensions so handlers
/// extracting it again skip token verification.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(State(state), req, next, &[Role::Admin])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Any valid token.
pub async fn require_authenticated(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(State(state), req, next, &Role::ALL)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, &[Role::Admin])?;
        Ok(RequireAdmin(auth_user))
    }
}

/// Front-office writes: admin or staff.
#[derive(Debug, Clone)]
pub struct RequireAdminOrStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdminOrStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, &[Role::Admin, Role::Staff])?;
        Ok(RequireAdminOrStaff(auth_user))
    }
}
