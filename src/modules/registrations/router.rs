use axum::{Router, routing::get};

use crate::modules::registrations::controller::{
    create_registration, delete_registration, get_current_id, get_registration,
    get_registrations, get_students_by_class, update_registration,
};
use crate::state::AppState;

pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_registrations).post(create_registration))
        .route("/currentId", get(get_current_id))
        .route("/studentByClass", get(get_students_by_class))
        .route(
            "/{id}",
            get(get_registration)
                .put(update_registration)
                .delete(delete_registration),
        )
}
