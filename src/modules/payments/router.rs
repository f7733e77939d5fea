use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::payments::controller::{
    create_payment, get_payments_by_registration, search_payments,
};
use crate::state::AppState;

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/registration/{registration_id}", get(get_payments_by_registration))
        .route("/search", get(search_payments))
}
