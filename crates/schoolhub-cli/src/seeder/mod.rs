//! Database seeding for development and demos.
//!
//! [`seed_all`] fills every table except `users` with a coherent school year:
//! levels and classes, students with one registration each, payments for the
//! paid registrations, exam scores, attendance and monthly transactions.

pub mod models;
pub mod records;
pub mod reference;
pub mod students;

pub use models::SeedConfig;

use sqlx::PgPool;
use std::time::Instant;

/// Seeds a full school year.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding school year {} ({} students)...\n",
        config.period(),
        config.total_students()
    );

    reference::seed_school_year(db, &config).await?;
    let (levels, classes) = reference::seed_levels(db, &config).await?;
    reference::seed_tuitions(db, &config, &levels).await?;
    let subject_ids = reference::seed_subjects(db).await?;

    let registrations = students::seed_students(db, &config, &classes).await?;
    students::seed_payments(db, &registrations, config.tuition).await?;
    records::seed_records(db, &config, &registrations, &subject_ids).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    Ok(())
}

/// Tables emptied by [`clear_all`], children first.
const SEEDED_TABLES: [&str; 11] = [
    "financial_transactions",
    "attendances",
    "exams",
    "payments",
    "registrations",
    "students",
    "tuition_fees",
    "subjects",
    "classes",
    "levels",
    "school_years",
];

/// Deletes all data except user accounts.
pub async fn clear_all(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;
    let mut total = 0;

    for table in SEEDED_TABLES {
        // table names are the constants above
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ {table}: {deleted}");
        total += deleted;
    }

    tx.commit().await?;

    println!(
        "\n✅ Deleted {} rows in {:?}",
        total,
        start_time.elapsed()
    );

    Ok(total)
}
