use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use schoolhub_core::{ErrorResponse, MessageResponse};
use schoolhub_models::common::NextIdResponse;

use crate::modules::auth::model::{
    AuthUserInfo, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use crate::modules::classes::model::{Class, CreateClassDto, UpdateClassDto};
use crate::modules::levels::model::{CreateLevelDto, Level, UpdateLevelDto};
use crate::modules::payments::model::{
    CreatePaymentDto, Payment, PaymentDetails, PaymentListResponse, PaymentMethod,
    PaymentSearchResponse,
};
use crate::modules::registrations::model::{
    ClassRoster, CreateRegistrationDto, RegistrationListResponse, RegistrationView, RosterEntry,
    UpdateRegistrationDto,
};
use crate::modules::reports::model::{
    AcademicReport, AllReports, AttendanceListRow, AttendanceReport, ClassAverage, ClassGradeRow,
    ExamComparison, FinancialReport, FinancialRow, GenderCounts, LevelCount, LevelGradeRow,
    MonthlyAttendance, MonthlyPayment, RegistrationReportRow, StudentListRow, StudentPerformance,
    StudentReport, StudentTrend, SubjectScore, TuitionStatus,
};
use crate::modules::school_years::model::{CreateSchoolYearDto, SchoolYear, UpdateSchoolYearDto};
use crate::modules::students::model::{
    CreateStudentDto, Gender, Student, StudentListResponse, UpdateStudentDto,
};
use crate::modules::tuitions::model::{CreateTuitionFeeDto, TuitionFee, UpdateTuitionFeeDto};
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User};
use schoolhub_auth::Role;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::check_auth,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student_by_student_id,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::registrations::controller::get_registrations,
        crate::modules::registrations::controller::get_current_id,
        crate::modules::registrations::controller::get_students_by_class,
        crate::modules::registrations::controller::get_registration,
        crate::modules::registrations::controller::create_registration,
        crate::modules::registrations::controller::update_registration,
        crate::modules::registrations::controller::delete_registration,
        crate::modules::payments::controller::create_payment,
        crate::modules::payments::controller::get_payments_by_registration,
        crate::modules::payments::controller::search_payments,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_current_class_id,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::levels::controller::get_levels,
        crate::modules::levels::controller::get_current_level_id,
        crate::modules::levels::controller::get_level_by_id,
        crate::modules::levels::controller::create_level,
        crate::modules::levels::controller::update_level,
        crate::modules::levels::controller::delete_level,
        crate::modules::school_years::controller::get_school_years,
        crate::modules::school_years::controller::get_school_year,
        crate::modules::school_years::controller::create_school_year,
        crate::modules::school_years::controller::update_school_year,
        crate::modules::school_years::controller::delete_school_year,
        crate::modules::tuitions::controller::get_tuitions,
        crate::modules::tuitions::controller::get_tuition_by_level_and_year,
        crate::modules::tuitions::controller::get_tuition,
        crate::modules::tuitions::controller::create_tuition,
        crate::modules::tuitions::controller::update_tuition,
        crate::modules::tuitions::controller::delete_tuition,
        crate::modules::common::controller::get_academic_years,
        crate::modules::common::controller::get_levels,
        crate::modules::common::controller::get_classes,
        crate::modules::reports::controller::get_student_report,
        crate::modules::reports::controller::get_financial_report,
        crate::modules::reports::controller::get_academic_report,
        crate::modules::reports::controller::get_student_trends,
        crate::modules::reports::controller::get_attendance_report,
        crate::modules::reports::controller::get_exam_comparisons,
        crate::modules::reports::controller::get_student_performance,
        crate::modules::reports::controller::get_registration_report,
        crate::modules::reports::controller::get_all_reports,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            NextIdResponse,
            Role,
            LoginRequest,
            LoginResponse,
            AuthUserInfo,
            RegisterRequest,
            RegisterResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            Gender,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            StudentListResponse,
            RegistrationView,
            CreateRegistrationDto,
            UpdateRegistrationDto,
            RegistrationListResponse,
            ClassRoster,
            RosterEntry,
            PaymentMethod,
            Payment,
            PaymentDetails,
            CreatePaymentDto,
            PaymentListResponse,
            PaymentSearchResponse,
            Class,
            CreateClassDto,
            UpdateClassDto,
            Level,
            CreateLevelDto,
            UpdateLevelDto,
            SchoolYear,
            CreateSchoolYearDto,
            UpdateSchoolYearDto,
            TuitionFee,
            CreateTuitionFeeDto,
            UpdateTuitionFeeDto,
            StudentReport,
            GenderCounts,
            LevelCount,
            TuitionStatus,
            StudentListRow,
            FinancialReport,
            MonthlyPayment,
            FinancialRow,
            AcademicReport,
            ClassAverage,
            ClassGradeRow,
            LevelGradeRow,
            StudentTrend,
            AttendanceReport,
            MonthlyAttendance,
            AttendanceListRow,
            ExamComparison,
            StudentPerformance,
            SubjectScore,
            RegistrationReportRow,
            AllReports,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Authentication", description = "Login, account registration and session check"),
        (name = "Users", description = "User management (admin only)"),
        (name = "Students", description = "Student records"),
        (name = "Registrations", description = "Enrollments and invoice IDs"),
        (name = "Payments", description = "Tuition payments"),
        (name = "Classes", description = "Classrooms"),
        (name = "Levels", description = "Grade levels"),
        (name = "School Years", description = "School years and the current year"),
        (name = "Tuitions", description = "Tuition fees per level and year"),
        (name = "Common", description = "Lookup lists for forms"),
        (name = "Reports", description = "Dashboard reports")
    ),
    info(
        title = "SchoolHub API",
        version = "0.1.0",
        description = "School administration REST API: students, enrollments, payments and reports.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_module() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/health",
            "/api/auth/login",
            "/api/students/student-id/{student_id}",
            "/api/registrations/currentId",
            "/api/payments/search",
            "/api/tuitions/level/{level}/year/{year}",
            "/api/common/classes",
            "/api/reports/all",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
