use axum::{Router, routing::get};

use crate::modules::students::controller::{
    create_student, delete_student, get_student, get_student_by_student_id, get_students,
    update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students).post(create_student))
        .route("/student-id/{student_id}", get(get_student_by_student_id))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
