use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse, MessageResponse};

use super::model::{CreateSchoolYearDto, SchoolYear, UpdateSchoolYearDto};
use super::service::SchoolYearService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    get,
    path = "/api/school-years",
    responses(
        (status = 200, description = "School years, latest first", body = [SchoolYear]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School Years"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_school_years(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<Vec<SchoolYear>>, AppError> {
    let years = SchoolYearService::get_school_years(&state.db).await?;
    Ok(ApiResponse::ok(years))
}

#[utoipa::path(
    get,
    path = "/api/school-years/{id}",
    params(("id" = String, Path, description = "School year ID, e.g. 2024")),
    responses(
        (status = 200, description = "School year details", body = SchoolYear),
        (status = 404, description = "School year not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School Years"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_school_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<ApiResponse<SchoolYear>, AppError> {
    let year = SchoolYearService::get_school_year(&state.db, &id).await?;
    Ok(ApiResponse::ok(year))
}

#[utoipa::path(
    post,
    path = "/api/school-years",
    request_body = CreateSchoolYearDto,
    responses(
        (status = 201, description = "School year created", body = SchoolYear),
        (status = 400, description = "Missing id/period or malformed period", body = ErrorResponse),
        (status = 409, description = "Duplicate id or period", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School Years"
)]
#[instrument(skip(state, dto))]
pub async fn create_school_year(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateSchoolYearDto>,
) -> Result<(StatusCode, Json<ApiResponse<SchoolYear>>), AppError> {
    let year = SchoolYearService::create_school_year(&state.db, dto).await?;
    Ok(ApiResponse::with_message(year, "School year created successfully").created())
}

#[utoipa::path(
    put,
    path = "/api/school-years/{id}",
    params(("id" = String, Path, description = "School year ID")),
    request_body = UpdateSchoolYearDto,
    responses(
        (status = 200, description = "School year updated", body = SchoolYear),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "School year not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School Years"
)]
#[instrument(skip(state, dto))]
pub async fn update_school_year(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSchoolYearDto>,
) -> Result<ApiResponse<SchoolYear>, AppError> {
    let year = SchoolYearService::update_school_year(&state.db, &id, dto).await?;
    Ok(ApiResponse::with_message(year, "School year updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/school-years/{id}",
    params(("id" = String, Path, description = "School year ID")),
    responses(
        (status = 200, description = "School year deleted", body = MessageResponse),
        (status = 404, description = "School year not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School Years"
)]
#[instrument(skip(state))]
pub async fn delete_school_year(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<MessageResponse, AppError> {
    SchoolYearService::delete_school_year(&state.db, &id).await?;
    Ok(MessageResponse::new("School year deleted successfully"))
}
