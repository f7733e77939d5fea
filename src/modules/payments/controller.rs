use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::instrument;

use schoolhub_core::{ApiResponse, AppError, ErrorResponse};

use super::model::{
    CreatePaymentDto, Payment, PaymentListResponse, PaymentSearchParams, PaymentSearchResponse,
};
use super::service::PaymentService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment recorded and registration marked paid", body = Payment),
        (status = 400, description = "Invalid amount or missing field", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, dto))]
pub async fn create_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), AppError> {
    let received_by = auth_user.user_id()?;
    let payment = PaymentService::create_payment(&state.db, dto, received_by).await?;
    Ok(ApiResponse::with_message(payment, "Payment recorded successfully").created())
}

#[utoipa::path(
    get,
    path = "/api/payments/registration/{registration_id}",
    params(("registration_id" = String, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Payments for the registration, latest first", body = PaymentListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_payments_by_registration(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedPath(registration_id): ValidatedPath<String>,
) -> Result<ApiResponse<PaymentListResponse>, AppError> {
    let payments = PaymentService::get_by_registration(&state.db, &registration_id).await?;
    Ok(ApiResponse::ok(PaymentListResponse { payments }))
}

#[utoipa::path(
    get,
    path = "/api/payments/search",
    params(PaymentSearchParams),
    responses(
        (status = 200, description = "Matching payments (at most 50)", body = PaymentSearchResponse),
        (status = 400, description = "Missing search query", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, _auth_user))]
pub async fn search_payments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedQuery(params): ValidatedQuery<PaymentSearchParams>,
) -> Result<ApiResponse<PaymentSearchResponse>, AppError> {
    let payments = PaymentService::search_payments(&state.db, params.query).await?;
    Ok(ApiResponse::ok(PaymentSearchResponse { payments }))
}
