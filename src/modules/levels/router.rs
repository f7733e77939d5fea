use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_level, delete_level, get_current_level_id, get_level_by_id, get_levels, update_level,
};

pub fn init_levels_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_levels).post(create_level))
        .route("/currentId", get(get_current_level_id))
        .route(
            "/{id}",
            get(get_level_by_id).put(update_level).delete(delete_level),
        )
}
