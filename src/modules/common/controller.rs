use axum::extract::State;
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse};
use schoolhub_models::classes::Class;
use schoolhub_models::common::ClassLookupParams;
use schoolhub_models::levels::Level;
use schoolhub_models::school_years::SchoolYear;

use super::service::CommonService;
use crate::middleware::auth::AuthUser;
use crate::modules::levels::service::LevelService;
use crate::modules::school_years::service::SchoolYearService;
use crate::state::AppState;
use crate::validator::ValidatedQuery;

#[utoipa::path(
    get,
    path = "/api/common/academic-years",
    responses(
        (status = 200, description = "School years, latest first", body = [SchoolYear]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Common"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_academic_years(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<ApiResponse<Vec<SchoolYear>>, AppError> {
    let years = SchoolYearService::get_school_years(&state.db).await?;
    Ok(ApiResponse::ok(years))
}

#[utoipa::path(
    get,
    path = "/api/common/levels",
    responses(
        (status = 200, description = "Levels ordered by id", body = [Level]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Common"
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
    path = "/api/common/classes",
    params(ClassLookupParams),
    responses(
        (status = 200, description = "Classes ordered by level and name", body = [Class]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Common"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_classes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ClassLookupParams>,
) -> Result<ApiResponse<Vec<Class>>, AppError> {
    let classes = CommonService::get_classes(&state.db, params).await?;
    Ok(ApiResponse::ok(classes))
}
