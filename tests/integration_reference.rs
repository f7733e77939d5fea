mod common;

use axum::http::StatusCode;
use common::{login_as, send, setup_test_app};
use schoolhub::schoolhub_auth::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_level_ids_are_sequential(pool: PgPool) {
    let admin = login_as(&pool, Role::Admin).await;

    let (status, body) =
        send(setup_test_app(pool.clone()), "GET", "/api/levels/currentId", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "001");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/levels",
        Some(&admin),
        Some(json!({ "name": "ມ.1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "001");
    assert_eq!(body["message"], "Level created successfully");

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/levels",
        Some(&admin),
        Some(json!({ "name": "ມ.2" })),
    )
    .await;
    assert_eq!(body["data"]["id"], "002");

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/levels",
        Some(&admin),
        Some(json!({ "id": "002", "name": "Duplicate" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_level_with_classes_cannot_be_deleted(pool: PgPool) {
    let admin = login_as(&pool, Role::Admin).await;

    send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/levels",
        Some(&admin),
        Some(json!({ "name": "ມ.1" })),
    )
    .await;
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/classes",
        Some(&admin),
        Some(json!({ "name": "ມ.1/1", "level": "001" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "001");

    let (status, body) =
        send(setup_test_app(pool.clone()), "DELETE", "/api/levels/001", Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Level has classes and cannot be deleted");

    let (status, _) =
        send(setup_test_app(pool.clone()), "DELETE", "/api/classes/001", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        send(setup_test_app(pool.clone()), "DELETE", "/api/levels/001", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        send(setup_test_app(pool), "GET", "/api/levels/001", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_requires_existing_level(pool: PgPool) {
    let admin = login_as(&pool, Role::Admin).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/classes",
        Some(&admin),
        Some(json!({ "name": "Orphan", "level": "404" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reference_writes_require_admin(pool: PgPool) {
    let staff = login_as(&pool, Role::Staff).await;

    for (uri, body) in [
        ("/api/levels", json!({ "name": "ມ.1" })),
        ("/api/classes", json!({ "name": "A", "level": "001" })),
        ("/api/school-years", json!({ "id": "2024", "period": "2024-2025" })),
        (
            "/api/tuitions",
            json!({ "name": "Fee", "year": "2024", "level": "001", "amount": 10.0 }),
        ),
    ] {
        let (status, _) = send(setup_test_app(pool.clone()), "POST", uri, Some(&staff), Some(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }

    let (status, _) = send(setup_test_app(pool), "GET", "/api/levels", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_school_year_defaults_and_single_current(pool: PgPool) {
    let admin = login_as(&pool, Role::Admin).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/school-years",
        Some(&admin),
        Some(json!({ "id": "2023", "period": "2023-2024", "is_current": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "2023-2024");
    assert_eq!(body["data"]["start_date"], "2023-05-01");
    assert_eq!(body["data"]["end_date"], "2024-04-30");

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/school-years",
        Some(&admin),
        Some(json!({ "id": "2024", "period": "2024-2025", "is_current": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let current: Vec<String> =
        sqlx::query_scalar("SELECT id FROM school_years WHERE is_current")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(current, vec!["2024".to_string()]);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/school-years",
        Some(&admin),
        Some(json!({ "id": "2025", "period": "next year" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/school-years",
        Some(&admin),
        Some(json!({ "id": "2099", "period": "2024-2025" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) =
        send(setup_test_app(pool), "GET", "/api/common/academic-years", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "2024");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tuition_lookup_by_level_and_year(pool: PgPool) {
    let admin = login_as(&pool, Role::Admin).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/tuitions",
        Some(&admin),
        Some(json!({ "name": "ຄ່າຮຽນ ມ.1", "year": "2024", "level": "001", "amount": 1500000.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/tuitions/level/001/year/2024",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"].as_f64(), Some(1500000.0));

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/tuitions/level/002/year/2024",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &format!("/api/tuitions/{id}"),
        Some(&admin),
        Some(json!({ "amount": 1600000.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"].as_f64(), Some(1600000.0));

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/tuitions",
        Some(&admin),
        Some(json!({ "name": "Free", "year": "2024", "level": "001", "amount": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        setup_test_app(pool),
        "DELETE",
        &format!("/api/tuitions/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_common_class_lookup_filters_by_level(pool: PgPool) {
    let teacher = login_as(&pool, Role::Teacher).await;
    sqlx::query("INSERT INTO levels (id, name) VALUES ('001', 'ມ.1'), ('002', 'ມ.2')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO classes (id, name, level) VALUES ('001', 'ມ.1/1', '001'), ('002', 'ມ.2/1', '002'), ('003', 'ມ.1/2', '001')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/common/classes?level_id=001",
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let classes = body["data"].as_array().unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0]["name"], "ມ.1/1");
    assert_eq!(classes[1]["name"], "ມ.1/2");

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/common/classes?level_id=all",
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) =
        send(setup_test_app(pool.clone()), "GET", "/api/classes/currentId", Some(&teacher), None).await;
    assert_eq!(body["data"]["id"], "004");

    let (_, body) = send(setup_test_app(pool), "GET", "/api/common/levels", Some(&teacher), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
