use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    get_academic_report, get_all_reports, get_attendance_report, get_exam_comparisons,
    get_financial_report, get_registration_report, get_student_performance, get_student_report,
    get_student_trends,
};

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/students", get(get_student_report))
        .route("/financial", get(get_financial_report))
        .route("/academic", get(get_academic_report))
        .route("/student-trends", get(get_student_trends))
        .route("/attendance", get(get_attendance_report))
        .route("/exam-comparisons", get(get_exam_comparisons))
        .route("/student-performance", get(get_student_performance))
        .route("/registration", get(get_registration_report))
        .route("/all", get(get_all_reports))
}
