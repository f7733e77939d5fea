use axum::extract::State;
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{
    AcademicReport, AllReports, AttendanceReport, ExamComparison, FinancialReport,
    RegistrationReportRow, ReportFilterParams, StudentPerformance, StudentReport, StudentTrend,
};
use super::service::ReportService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedQuery;

#[utoipa::path(
    get,
    path = "/api/reports/students",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Gender and level breakdown, tuition status and student list", body = StudentReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<StudentReport>, AppError> {
    Ok(ApiResponse::ok(ReportService::students(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/financial",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Monthly payments and income/expense summary", body = FinancialReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_financial_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<FinancialReport>, AppError> {
    Ok(ApiResponse::ok(ReportService::financial(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/academic",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Class averages and grade tables", body = AcademicReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_academic_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<AcademicReport>, AppError> {
    Ok(ApiResponse::ok(ReportService::academic(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/student-trends",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Enrollment count per school year", body = [StudentTrend]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_trends(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<Vec<StudentTrend>>, AppError> {
    Ok(ApiResponse::ok(ReportService::student_trends(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Monthly attendance rates and per-student attendance", body = AttendanceReport),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_attendance_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<AttendanceReport>, AppError> {
    Ok(ApiResponse::ok(ReportService::attendance(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/exam-comparisons",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Score statistics per subject and class", body = [ExamComparison]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_exam_comparisons(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<Vec<ExamComparison>>, AppError> {
    Ok(ApiResponse::ok(ReportService::exam_comparisons(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/student-performance",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Top students by mean score", body = [StudentPerformance]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_performance(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<Vec<StudentPerformance>>, AppError> {
    Ok(ApiResponse::ok(ReportService::student_performance(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/registration",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Registration table", body = [RegistrationReportRow]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_registration_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<Vec<RegistrationReportRow>>, AppError> {
    Ok(ApiResponse::ok(ReportService::registrations(&state.db, &params).await))
}

#[utoipa::path(
    get,
    path = "/api/reports/all",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Students, financial, academic, trend and attendance sections", body = AllReports),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_all_reports(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<ReportFilterParams>,
) -> Result<ApiResponse<AllReports>, AppError> {
    Ok(ApiResponse::ok(ReportService::all(&state.db, &params).await))
}
