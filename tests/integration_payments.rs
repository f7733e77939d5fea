mod common;

use axum::http::StatusCode;
use common::{insert_registration, insert_student, login_as, send, setup_test_app};
use schoolhub::schoolhub_auth::Role;
use serde_json::json;
use sqlx::PgPool;

async fn enrolled(pool: &PgPool) {
    insert_student(pool, "001", "Somphone").await;
    insert_registration(pool, "INV-001", "001", "2024").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_marks_registration_paid(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;
    enrolled(&pool).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/payments",
        Some(&token),
        Some(json!({
            "registration_id": "INV-001",
            "amount": 1500000.0,
            "payment_date": "2024-09-01",
            "payment_method": "bank_transfer",
            "receipt_number": "R-100"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Payment recorded successfully");
    assert_eq!(body["data"]["registration_id"], "INV-001");
    assert_eq!(body["data"]["payment_method"], "bank_transfer");
    assert_eq!(body["data"]["amount"].as_f64(), Some(1500000.0));
    assert!(body["data"]["received_by"].is_string());

    let paid: bool = sqlx::query_scalar("SELECT paid FROM registrations WHERE id = 'INV-001'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(paid);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_for_unknown_registration(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/payments",
        Some(&token),
        Some(json!({ "registration_id": "INV-404", "amount": 10.0, "payment_date": "2024-09-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Registration not found");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_amount_must_be_positive(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;
    enrolled(&pool).await;

    for amount in [0.0, -5.0] {
        let (status, body) = send(
            setup_test_app(pool.clone()),
            "POST",
            "/api/payments",
            Some(&token),
            Some(json!({ "registration_id": "INV-001", "amount": amount, "payment_date": "2024-09-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "amount must be greater than 0");
    }

    let paid: bool = sqlx::query_scalar("SELECT paid FROM registrations WHERE id = 'INV-001'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!paid);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_and_search_payments(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;
    enrolled(&pool).await;

    for (date, receipt) in [("2024-09-01", "R-1"), ("2024-10-01", "R-2")] {
        let (status, _) = send(
            setup_test_app(pool.clone()),
            "POST",
            "/api/payments",
            Some(&token),
            Some(json!({
                "registration_id": "INV-001",
                "amount": 100.0,
                "payment_date": date,
                "receipt_number": receipt
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/payments/registration/INV-001",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payments = body["data"]["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0]["receipt_number"], "R-2");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/payments/search?query=somph",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payments"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["payments"][0]["student_name"], "Somphone");

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        "/api/payments/search?query=%20",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_registration_removes_payments(pool: PgPool) {
    let staff = login_as(&pool, Role::Staff).await;
    let admin = login_as(&pool, Role::Admin).await;
    enrolled(&pool).await;

    send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/payments",
        Some(&staff),
        Some(json!({ "registration_id": "INV-001", "amount": 100.0, "payment_date": "2024-09-01" })),
    )
    .await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        "/api/registrations/INV-001",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payments_require_token(pool: PgPool) {
    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        "/api/payments/registration/INV-001",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
