use anyhow::Context;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use schoolhub_auth::{Role, create_access_token};
use schoolhub_config::JwtConfig;
use schoolhub_core::{AppError, verify_password};

use super::model::{AuthUserInfo, LoginRequest, LoginResponse, RegisterRequest};
use crate::metrics::{track_login_failure, track_login_success};
use crate::modules::users::model::{CreateUserDto, UserCredentials};
use crate::modules::users::service::UserService;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    /// Verifies credentials and issues an access token.
    ///
    /// Unknown usernames and wrong passwords produce the same 401.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password, name, role, active FROM users WHERE username = $1",
        )
        .bind(dto.username.trim())
        .fetch_optional(db)
        .await
        .context("Failed to look up user")
        .map_err(AppError::database)?;

        let Some(user) = credentials else {
            track_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.active {
            warn!(user_id = %user.id, "Login attempt on inactive account");
            track_login_failure("inactive");
            return Err(AppError::unauthorized("Account is inactive"));
        }

        let token = create_access_token(user.id, &user.username, user.role, jwt_config)?;
        track_login_success(user.role.as_str());

        Ok(LoginResponse {
            user: AuthUserInfo {
                id: user.id,
                username: user.username,
                name: user.name,
                role: user.role,
            },
            token,
        })
    }

    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn register(db: &PgPool, dto: RegisterRequest) -> Result<Uuid, AppError> {
        let role = match dto.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(value) => value
                .parse::<Role>()
                .map_err(|e| AppError::bad_request(anyhow::anyhow!(e.to_string())))?,
        };

        let user = UserService::create_user(
            db,
            CreateUserDto {
                username: dto.username,
                password: dto.password,
                name: dto.name,
                role,
            },
        )
        .await?;

        Ok(user.id)
    }

    /// The token's user, provided the account still exists and is active.
    #[instrument(skip(db))]
    pub async fn current_user(db: &PgPool, user_id: Uuid) -> Result<AuthUserInfo, AppError> {
        let user = UserService::get_user(db, user_id)
            .await
            .map_err(|e| {
                if e.status.is_client_error() {
                    AppError::unauthorized("User not found")
                } else {
                    e
                }
            })?;

        if !user.active {
            return Err(AppError::unauthorized("Account is inactive"));
        }

        Ok(user.into())
    }
}
