#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use schoolhub::router::init_router;
use schoolhub::schoolhub_auth::Role;
use schoolhub::schoolhub_config::{CorsConfig, JwtConfig};
use schoolhub::schoolhub_core::hash_password;
use schoolhub::state::AppState;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

pub fn generate_unique_username() -> String {
    format!("user-{}", &Uuid::new_v4().simple().to_string()[..12])
}

/// Inserts an active user with [`TEST_PASSWORD`].
pub async fn create_test_user(pool: &PgPool, role: Role) -> TestUser {
    let username = generate_unique_username();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, password, name, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&username)
    .bind(&hashed)
    .bind("Test User")
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

pub async fn get_auth_token(app: axum::Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Creates a user with `role` and returns a token for it.
pub async fn login_as(pool: &PgPool, role: Role) -> String {
    let user = create_test_user(pool, role).await;
    get_auth_token(setup_test_app(pool.clone()), &user.username, &user.password).await
}

/// Sends one request through the router and returns the status and JSON body.
pub async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn insert_student(pool: &PgPool, student_id: &str, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO students (student_id, student_name_lao, gender) VALUES ($1, $2, 'M') RETURNING id",
    )
    .bind(student_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_registration(pool: &PgPool, id: &str, student_id: &str, school_year: &str) {
    sqlx::query(
        "INSERT INTO registrations (id, student_id, classroom, level, school_year) VALUES ($1, $2, '001', '001', $3)",
    )
    .bind(id)
    .bind(student_id)
    .bind(school_year)
    .execute(pool)
    .await
    .unwrap();
}
