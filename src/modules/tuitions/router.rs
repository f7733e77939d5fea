use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_tuition, delete_tuition, get_tuition, get_tuition_by_level_and_year, get_tuitions,
    update_tuition,
};

pub fn init_tuitions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_tuitions).post(create_tuition))
        .route("/level/{level}/year/{year}", get(get_tuition_by_level_and_year))
        .route(
            "/{id}",
            get(get_tuition).put(update_tuition).delete(delete_tuition),
        )
}
