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
use crate::modules::classes::model::{Class, ClassFilterParams, CreateClassDto, UpdateClassDto};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams),
    responses(
        (status = 200, description = "Classes ordered by id", body = [Class]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_classes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ClassFilterParams>,
) -> Result<ApiResponse<Vec<Class>>, AppError> {
    let classes = ClassService::get_classes(&state.db, params).await?;
    Ok(ApiResponse::ok(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/currentId",
    responses(
        (status = 200, description = "Next class id", body = NextIdResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_current_class_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<NextIdResponse>, AppError> {
    let id = ClassService::current_id(&state.db).await?;
    Ok(ApiResponse::ok(NextIdResponse { id }))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = Class),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<ApiResponse<Class>, AppError> {
    let class = ClassService::get_class(&state.db, &id).await?;
    Ok(ApiResponse::ok(class))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 400, description = "Missing name or level", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 409, description = "Duplicate id or unknown level", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ApiResponse<Class>>), AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok(ApiResponse::with_message(class, "Class created successfully").created())
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<ApiResponse<Class>, AppError> {
    let class = ClassService::update_class(&state.db, &id, dto).await?;
    Ok(ApiResponse::with_message(class, "Class updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<MessageResponse, AppError> {
    ClassService::delete_class(&state.db, &id).await?;
    Ok(MessageResponse::new("Class deleted successfully"))
}
