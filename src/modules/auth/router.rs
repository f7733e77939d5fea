use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{check_auth, login, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/check", get(check_auth))
}
