use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::{require_admin, require_authenticated};
use crate::modules::auth::router::init_auth_router;
use crate::modules::classes::router::init_classes_router;
use crate::modules::common::router::init_common_router;
use crate::modules::levels::router::init_levels_router;
use crate::modules::payments::router::init_payments_router;
use crate::modules::registrations::router::init_registrations_router;
use crate::modules::reports::router::init_reports_router;
use crate::modules::school_years::router::init_school_years_router;
use crate::modules::students::router::init_students_router;
use crate::modules::tuitions::router::init_tuitions_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware, routing::get};
use schoolhub_core::{AppError, MessageResponse};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
    tag = "Health"
)]
pub async fn health() -> MessageResponse {
    MessageResponse::new("SchoolHub API is running")
}

async fn route_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Route not found"))
}

pub fn init_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), require_authenticated);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                .nest("/auth", init_auth_router())
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest("/students", init_students_router())
                .nest("/registrations", init_registrations_router())
                .nest("/payments", init_payments_router().route_layer(authenticated()))
                .nest("/classes", init_classes_router())
                .nest("/levels", init_levels_router())
                .nest("/school-years", init_school_years_router())
                .nest("/tuitions", init_tuitions_router())
                .nest("/common", init_common_router().route_layer(authenticated()))
                .nest("/reports", init_reports_router().route_layer(authenticated())),
        )
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
