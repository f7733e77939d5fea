use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse, MessageResponse};

use super::model::{
    CreateStudentDto, Student, StudentFilterParams, StudentListResponse, UpdateStudentDto,
};
use super::service::StudentService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireAdminOrStaff};
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Page of students ordered by student ID", body = StudentListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_students(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<StudentFilterParams>,
) -> Result<ApiResponse<StudentListResponse>, AppError> {
    let students = StudentService::get_students(&state.db, params).await?;
    Ok(ApiResponse::ok(students))
}

#[utoipa::path(
    get,
    path = "/api/students/student-id/{student_id}",
    params(("student_id" = String, Path, description = "Human-readable student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student_by_student_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(student_id): ValidatedPath<String>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = StudentService::get_by_student_id(&state.db, &student_id).await?;
    Ok(ApiResponse::ok(student))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student UUID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(ApiResponse::ok(student))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Missing name or gender", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or staff only", body = ErrorResponse),
        (status = 409, description = "Student ID already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdminOrStaff(_user): RequireAdminOrStaff,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok(ApiResponse::with_message(student, "Student created successfully").created())
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student UUID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Student ID already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireAdminOrStaff(_user): RequireAdminOrStaff,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<ApiResponse<Student>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message(student, "Student updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student UUID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Student has registrations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<MessageResponse, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(MessageResponse::new("Student deleted successfully"))
}
