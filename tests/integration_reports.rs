mod common;

use axum::http::StatusCode;
use common::{insert_registration, insert_student, login_as, send, setup_test_app};
use schoolhub::schoolhub_auth::Role;
use sqlx::PgPool;

async fn seed(pool: &PgPool) {
    sqlx::query("INSERT INTO levels (id, name) VALUES ('001', 'ມ.1'), ('002', 'ມ.2')")
        .execute(pool)
        .await
        .unwrap();
    insert_student(pool, "001", "Khamla").await;
    insert_student(pool, "002", "Noy").await;
    sqlx::query("UPDATE students SET gender = 'F' WHERE student_id = '002'")
        .execute(pool)
        .await
        .unwrap();
    insert_registration(pool, "INV-001", "001", "2024").await;
    insert_registration(pool, "INV-002", "002", "2024").await;
    insert_registration(pool, "INV-003", "001", "2023").await;
    sqlx::query(
        "INSERT INTO payments (registration_id, amount, payment_date) VALUES ('INV-001', 100, '2024-09-05'), ('INV-002', 50, '2024-09-20'), ('INV-002', 25, '2024-10-01')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO financial_transactions (transaction_date, type, amount, academic_year_id) VALUES ('2024-09-01', 'income', 300, '2024'), ('2024-09-15', 'expense', 120, '2024')",
    )
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_financial_report_for_empty_year(pool: PgPool) {
    let token = login_as(&pool, Role::Teacher).await;

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/api/reports/financial?year_id=2030",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["monthlyPayments"], serde_json::json!([]));
    assert_eq!(body["data"]["financialReport"], serde_json::json!([]));
    assert_eq!(body["data"]["totalAmount"].as_f64(), Some(0.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_financial_report_sums_by_month(pool: PgPool) {
    let token = login_as(&pool, Role::Admin).await;
    seed(&pool).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/reports/financial?year_id=2024",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let monthly = body["data"]["monthlyPayments"].as_array().unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0]["month_number"], 9);
    assert_eq!(monthly[0]["month"], "ກັນຍາ");
    assert_eq!(monthly[0]["amount"].as_f64(), Some(150.0));
    assert_eq!(body["data"]["totalAmount"].as_f64(), Some(175.0));

    let rows = body["data"]["financialReport"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["income"].as_f64(), Some(300.0));
    assert_eq!(rows[0]["expenses"].as_f64(), Some(120.0));
    assert_eq!(rows[0]["balance"].as_f64(), Some(180.0));
    assert_eq!(rows[0]["yearId"], "2024");

    let (_, body) = send(
        setup_test_app(pool),
        "GET",
        "/api/reports/financial?year_id=2024&month=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["totalAmount"].as_f64(), Some(25.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unparseable_month_is_ignored(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;
    seed(&pool).await;

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/api/reports/financial?year_id=2024&month=abc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalAmount"].as_f64(), Some(175.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_report_sections(pool: PgPool) {
    let token = login_as(&pool, Role::Teacher).await;
    seed(&pool).await;
    sqlx::query("UPDATE registrations SET paid = TRUE WHERE id = 'INV-001'")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/api/reports/students?year_id=2024&level_id=all",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["studentsByGender"]["male"], 1);
    assert_eq!(data["studentsByGender"]["female"], 1);
    assert_eq!(data["studentsByGender"]["total"], 2);
    assert_eq!(data["tuitionStatus"]["paid"], 1);
    assert_eq!(data["tuitionStatus"]["unpaid"], 1);

    let levels = data["studentsByLevel"].as_array().unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0]["level_id"], "001");
    assert_eq!(levels[0]["count"], 2);
    assert_eq!(levels[1]["count"], 0);
    assert!(levels[0]["color"].as_str().unwrap().starts_with('#'));

    let list = data["studentList"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Khamla");
    assert_eq!(list[0]["gender"], "ຊາຍ");
    assert_eq!(list[1]["gender"], "ຍິງ");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_report_rows(pool: PgPool) {
    let token = login_as(&pool, Role::Staff).await;
    seed(&pool).await;

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/api/reports/registration?year_id=2023",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "INV-003");
    assert_eq!(rows[0]["code"], "001");
    assert_eq!(rows[0]["level"], "ມ.1");
    assert_eq!(rows[0]["yearId"], "2023");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_reports_on_empty_database(pool: PgPool) {
    let token = login_as(&pool, Role::Admin).await;

    let (status, body) = send(setup_test_app(pool), "GET", "/api/reports/all", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["students"]["studentsByGender"]["total"], 0);
    assert_eq!(data["students"]["studentList"], serde_json::json!([]));
    assert_eq!(data["financial"]["totalAmount"].as_f64(), Some(0.0));
    assert_eq!(data["academic"]["classAverages"], serde_json::json!([]));
    assert_eq!(data["studentTrends"], serde_json::json!([]));
    assert_eq!(data["attendance"]["attendanceList"], serde_json::json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reports_require_token(pool: PgPool) {
    let (status, _) = send(setup_test_app(pool), "GET", "/api/reports/students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
