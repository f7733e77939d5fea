mod common;

use axum::http::StatusCode;
use common::{create_test_user, get_auth_token, login_as, send, setup_test_app};
use schoolhub::schoolhub_auth::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let user = create_test_user(&pool, Role::Staff).await;

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": user.username, "password": user.password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["username"], user.username);
    assert_eq!(body["data"]["user"]["role"], "staff");
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let user = create_test_user(&pool, Role::Admin).await;

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": user.username, "password": "wrongpassword" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid username or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_user_same_message(pool: PgPool) {
    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "whatever" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_missing_fields(pool: PgPool) {
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_whitespace_username(pool: PgPool) {
    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "   ", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "username is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_inactive_account(pool: PgPool) {
    let user = create_test_user(&pool, Role::Teacher).await;
    sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": user.username, "password": user.password })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_returns_current_user(pool: PgPool) {
    let user = create_test_user(&pool, Role::Teacher).await;
    let token = get_auth_token(setup_test_app(pool.clone()), &user.username, &user.password).await;

    let (status, body) = send(setup_test_app(pool), "GET", "/api/auth/check", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["role"], "teacher");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_without_token(pool: PgPool) {
    let (status, body) = send(setup_test_app(pool.clone()), "GET", "/api/auth/check", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        "/api/auth/check",
        Some("not-a-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_deleted_user(pool: PgPool) {
    let user = create_test_user(&pool, Role::Staff).await;
    let token = get_auth_token(setup_test_app(pool.clone()), &user.username, &user.password).await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(setup_test_app(pool), "GET", "/api/auth/check", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_as_admin(pool: PgPool) {
    let token = login_as(&pool, Role::Admin).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "username": "newstaff", "password": "secret123", "name": "New Staff" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["userId"].is_string());

    let role: String = sqlx::query_scalar("SELECT role::text FROM users WHERE username = 'newstaff'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "staff");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_invalid_role_and_duplicate(pool: PgPool) {
    let token = login_as(&pool, Role::Admin).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "username": "x1", "password": "secret123", "name": "X", "role": "principal" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "username": "dup", "password": "secret123", "name": "Dup" });
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_requires_admin(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/register",
        Some(&token),
        Some(json!({ "username": "x2", "password": "secret123", "name": "X" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_and_fallback(pool: PgPool) {
    let (status, body) = send(setup_test_app(pool.clone()), "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(setup_test_app(pool), "GET", "/api/does-not-exist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}
