use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse, MessageResponse};
use schoolhub_models::common::NextIdResponse;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::levels::model::{CreateLevelDto, Level, UpdateLevelDto};
use crate::modules::levels::service::LevelService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    get,
    path = "/api/levels",
    responses(
        (status = 200, description = "All levels ordered by id", body = [Level]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Levels"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_levels(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<Vec<Level>>, AppError> {
    let levels = LevelService::get_levels(&state.db).await?;
    Ok(ApiResponse::ok(levels))
}

#[utoipa::path(
    get,
    path = "/api/levels/currentId",
    responses(
        (status = 200, description = "Next level id", body = NextIdResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Levels"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_current_level_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<NextIdResponse>, AppError> {
    let id = LevelService::current_id(&state.db).await?;
    Ok(ApiResponse::ok(NextIdResponse { id }))
}

#[utoipa::path(
    get,
    path = "/api/levels/{id}",
    params(("id" = String, Path, description = "Level ID")),
    responses(
        (status = 200, description = "Level details", body = Level),
        (status = 404, description = "Level not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Levels"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_level_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<ApiResponse<Level>, AppError> {
    let level = LevelService::get_level(&state.db, &id).await?;
    Ok(ApiResponse::ok(level))
}

#[utoipa::path(
    post,
    path = "/api/levels",
    request_body = CreateLevelDto,
    responses(
        (status = 201, description = "Level created", body = Level),
        (status = 400, description = "Missing name", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 409, description = "Level ID already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Levels"
)]
#[instrument(skip(state, dto))]
pub async fn create_level(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateLevelDto>,
) -> Result<(StatusCode, Json<ApiResponse<Level>>), AppError> {
    let level = LevelService::create_level(&state.db, dto).await?;
    Ok(ApiResponse::with_message(level, "Level created successfully").created())
}

#[utoipa::path(
    put,
    path = "/api/levels/{id}",
    params(("id" = String, Path, description = "Level ID")),
    request_body = UpdateLevelDto,
    responses(
        (status = 200, description = "Level updated", body = Level),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Level not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Levels"
)]
#[instrument(skip(state, dto))]
pub async fn update_level(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
    ValidatedJson(dto): ValidatedJson<UpdateLevelDto>,
) -> Result<ApiResponse<Level>, AppError> {
    let level = LevelService::update_level(&state.db, &id, dto).await?;
    Ok(ApiResponse::with_message(level, "Level updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/levels/{id}",
    params(("id" = String, Path, description = "Level ID")),
    responses(
        (status = 200, description = "Level deleted", body = MessageResponse),
        (status = 404, description = "Level not found", body = ErrorResponse),
        (status = 409, description = "Level still has classes", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Levels"
)]
#[instrument(skip(state))]
pub async fn delete_level(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<MessageResponse, AppError> {
    LevelService::delete_level(&state.db, &id).await?;
    Ok(MessageResponse::new("Level deleted successfully"))
}
