use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_academic_years, get_classes, get_levels};

pub fn init_common_router() -> Router<AppState> {
    Router::new()
        .route("/academic-years", get(get_academic_years))
        .route("/levels", get(get_levels))
        .route("/classes", get(get_classes))
}
