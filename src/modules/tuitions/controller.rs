use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse, MessageResponse};

use super::model::{CreateTuitionFeeDto, TuitionFee, UpdateTuitionFeeDto};
use super::service::TuitionService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath};

#[utoipa::path(
    get,
    path = "/api/tuitions",
    responses(
        (status = 200, description = "All tuition fees", body = [TuitionFee]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tuitions"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_tuitions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<Vec<TuitionFee>>, AppError> {
    let fees = TuitionService::get_tuitions(&state.db).await?;
    Ok(ApiResponse::ok(fees))
}

#[utoipa::path(
    get,
    path = "/api/tuitions/level/{level}/year/{year}",
    params(
        ("level" = String, Path, description = "Level ID"),
        ("year" = String, Path, description = "School year ID")
    ),
    responses(
        (status = 200, description = "Tuition fee for the level and year", body = TuitionFee),
        (status = 404, description = "No fee configured", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tuitions"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_tuition_by_level_and_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath((level, year)): ValidatedPath<(String, String)>,
) -> Result<ApiResponse<TuitionFee>, AppError> {
    let fee = TuitionService::get_by_level_and_year(&state.db, &level, &year).await?;
    Ok(ApiResponse::ok(fee))
}

#[utoipa::path(
    get,
    path = "/api/tuitions/{id}",
    params(("id" = String, Path, description = "Tuition fee ID")),
    responses(
        (status = 200, description = "Tuition fee details", body = TuitionFee),
        (status = 404, description = "Tuition fee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tuitions"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_tuition(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<ApiResponse<TuitionFee>, AppError> {
    let fee = TuitionService::get_tuition(&state.db, &id).await?;
    Ok(ApiResponse::ok(fee))
}

#[utoipa::path(
    post,
    path = "/api/tuitions",
    request_body = CreateTuitionFeeDto,
    responses(
        (status = 201, description = "Tuition fee created", body = TuitionFee),
        (status = 400, description = "Missing field or non-positive amount", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tuitions"
)]
#[instrument(skip(state, dto))]
pub async fn create_tuition(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTuitionFeeDto>,
) -> Result<(StatusCode, Json<ApiResponse<TuitionFee>>), AppError> {
    let fee = TuitionService::create_tuition(&state.db, dto).await?;
    Ok(ApiResponse::with_message(fee, "Tuition fee created successfully").created())
}

#[utoipa::path(
    put,
    path = "/api/tuitions/{id}",
    params(("id" = String, Path, description = "Tuition fee ID")),
    request_body = UpdateTuitionFeeDto,
    responses(
        (status = 200, description = "Tuition fee updated", body = TuitionFee),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Tuition fee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tuitions"
)]
#[instrument(skip(state, dto))]
pub async fn update_tuition(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
    ValidatedJson(dto): ValidatedJson<UpdateTuitionFeeDto>,
) -> Result<ApiResponse<TuitionFee>, AppError> {
    let fee = TuitionService::update_tuition(&state.db, &id, dto).await?;
    Ok(ApiResponse::with_message(fee, "Tuition fee updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/tuitions/{id}",
    params(("id" = String, Path, description = "Tuition fee ID")),
    responses(
        (status = 200, description = "Tuition fee deleted", body = MessageResponse),
        (status = 404, description = "Tuition fee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tuitions"
)]
#[instrument(skip(state))]
pub async fn delete_tuition(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<MessageResponse, AppError> {
    TuitionService::delete_tuition(&state.db, &id).await?;
    Ok(MessageResponse::new("Tuition fee deleted successfully"))
}
