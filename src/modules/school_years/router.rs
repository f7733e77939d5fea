use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_school_year, delete_school_year, get_school_year, get_school_years, update_school_year,
};

pub fn init_school_years_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_school_years).post(create_school_year))
        .route(
            "/{id}",
            get(get_school_year)
                .put(update_school_year)
                .delete(delete_school_year),
        )
}
