use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse, MessageResponse};
use schoolhub_models::common::NextIdResponse;

use super::model::{
    ClassRoster, ClassRosterParams, CreateRegistrationDto, RegistrationFilterParams,
    RegistrationListResponse, RegistrationView, UpdateRegistrationDto,
};
use super::service::RegistrationService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireAdminOrStaff};
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/registrations",
    params(RegistrationFilterParams),
    responses(
        (status = 200, description = "Page of registrations, newest first", body = RegistrationListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_registrations(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<RegistrationFilterParams>,
) -> Result<ApiResponse<RegistrationListResponse>, AppError> {
    let registrations = RegistrationService::get_registrations(&state.db, params).await?;
    Ok(ApiResponse::ok(registrations))
}

#[utoipa::path(
    get,
    path = "/api/registrations/currentId",
    responses(
        (status = 200, description = "Invoice ID the next registration would receive", body = NextIdResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_current_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<NextIdResponse>, AppError> {
    let id = RegistrationService::current_id(&state.db).await?;
    Ok(ApiResponse::ok(NextIdResponse { id }))
}

#[utoipa::path(
    get,
    path = "/api/registrations/studentByClass",
    params(ClassRosterParams),
    responses(
        (status = 200, description = "Enrolled students grouped by classroom", body = Vec<ClassRoster>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_students_by_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ClassRosterParams>,
) -> Result<ApiResponse<Vec<ClassRoster>>, AppError> {
    let rosters = RegistrationService::students_by_class(&state.db, params).await?;
    Ok(ApiResponse::ok(rosters))
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(("id" = String, Path, description = "Invoice ID, e.g. INV-001")),
    responses(
        (status = 200, description = "Registration details", body = RegistrationView),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_registration(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<ApiResponse<RegistrationView>, AppError> {
    let registration = RegistrationService::get_registration(&state.db, &id).await?;
    Ok(ApiResponse::ok(registration))
}

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 201, description = "Registration created", body = RegistrationView),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, dto))]
pub async fn create_registration(
    State(state): State<AppState>,
    RequireAdminOrStaff(_user): RequireAdminOrStaff,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationView>>), AppError> {
    let registration = RegistrationService::create_registration(&state.db, dto).await?;
    Ok(ApiResponse::with_message(registration, "Registration created successfully").created())
}

#[utoipa::path(
    put,
    path = "/api/registrations/{id}",
    params(("id" = String, Path, description = "Invoice ID")),
    request_body = UpdateRegistrationDto,
    responses(
        (status = 200, description = "Registration updated", body = RegistrationView),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state, dto))]
pub async fn update_registration(
    State(state): State<AppState>,
    RequireAdminOrStaff(_user): RequireAdminOrStaff,
    ValidatedPath(id): ValidatedPath<String>,
    ValidatedJson(dto): ValidatedJson<UpdateRegistrationDto>,
) -> Result<ApiResponse<RegistrationView>, AppError> {
    let registration = RegistrationService::update_registration(&state.db, &id, dto).await?;
    Ok(ApiResponse::with_message(registration, "Registration updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    params(("id" = String, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Registration and its payments deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn delete_registration(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<MessageResponse, AppError> {
    RegistrationService::delete_registration(&state.db, &id).await?;
    Ok(MessageResponse::new("Registration deleted successfully"))
}
