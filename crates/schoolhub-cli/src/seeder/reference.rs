//! Reference data seeding: levels, classes, the school year, subjects and
//! tuition fees.
//!
//! Rows use fixed ids so running the seeder twice leaves one copy.

use chrono::NaiveDate;
use schoolhub_db::Sequence;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::{ClassSeed, LevelSeed, SeedConfig};

pub const SUBJECTS: [&str; 6] = [
    "ພາສາລາວ",
    "ຄະນິດສາດ",
    "ພາສາອັງກິດ",
    "ວິທະຍາສາດ",
    "ປະຫວັດສາດ",
    "ພູມສາດ",
];

/// Classes are named `<level>/<n>`, e.g. `ມ.1/2`.
pub fn generate_levels(config: &SeedConfig) -> (Vec<LevelSeed>, Vec<ClassSeed>) {
    let mut levels = Vec::with_capacity(config.levels);
    let mut classes = Vec::with_capacity(config.total_classes());

    for i in 1..=config.levels {
        let level = LevelSeed {
            id: Sequence::LEVELS.format(i as u64),
            name: format!("ມ.{}", i),
        };
        for j in 1..=config.classes_per_level {
            classes.push(ClassSeed {
                id: Sequence::CLASSES.format((classes.len() + 1) as u64),
                name: format!("{}/{}", level.name, j),
                level: level.id.clone(),
            });
        }
        levels.push(level);
    }

    (levels, classes)
}

/// Seeds levels and their classes
pub async fn seed_levels(
    db: &PgPool,
    config: &SeedConfig,
) -> Result<(Vec<LevelSeed>, Vec<ClassSeed>), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "📊 Seeding {} levels with {} classes each...",
        config.levels, config.classes_per_level
    );

    let (levels, classes) = generate_levels(config);
    if levels.is_empty() {
        return Ok((levels, classes));
    }

    let mut tx = db.begin().await?;

    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO levels (id, name) ");
    qb.push_values(&levels, |mut b, level| {
        b.push_bind(level.id.clone()).push_bind(level.name.clone());
    });
    qb.push(" ON CONFLICT (id) DO NOTHING");
    qb.build().execute(&mut *tx).await?;

    if !classes.is_empty() {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO classes (id, name, level) ");
        qb.push_values(&classes, |mut b, class| {
            b.push_bind(class.id.clone())
                .push_bind(class.name.clone())
                .push_bind(class.level.clone());
        });
        qb.push(" ON CONFLICT (id) DO NOTHING");
        qb.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} levels and {} classes in {:?}",
        levels.len(),
        classes.len(),
        start_time.elapsed()
    );

    Ok((levels, classes))
}

/// Seeds the school year and marks it current
pub async fn seed_school_year(
    db: &PgPool,
    config: &SeedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("📅 Seeding school year {}...", config.period());

    let start_date = NaiveDate::from_ymd_opt(config.start_year, 5, 1).ok_or("invalid start year")?;
    let end_date =
        NaiveDate::from_ymd_opt(config.start_year + 1, 4, 30).ok_or("invalid start year")?;

    let mut tx = db.begin().await?;

    sqlx::query("UPDATE school_years SET is_current = FALSE WHERE id <> $1")
        .bind(config.year_id())
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO school_years (id, period, name, start_date, end_date, is_current)
         VALUES ($1, $2, $2, $3, $4, TRUE)
         ON CONFLICT (id) DO UPDATE SET is_current = TRUE, updated_at = NOW()",
    )
    .bind(config.year_id())
    .bind(config.period())
    .bind(start_date)
    .bind(end_date)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Seeds one tuition fee per level for the seeded year
pub async fn seed_tuitions(
    db: &PgPool,
    config: &SeedConfig,
    levels: &[LevelSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if levels.is_empty() {
        return Ok(());
    }
    println!("💰 Seeding tuition fees...");

    let year = config.year_id();
    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO tuition_fees (id, name, year, level, amount) ");
    qb.push_values(levels, |mut b, level| {
        b.push_bind(format!("{}-{}", year, level.id))
            .push_bind(format!("ຄ່າຮຽນ {} {}", level.name, config.period()))
            .push_bind(year.clone())
            .push_bind(level.id.clone())
            .push_bind(config.tuition);
    });
    qb.push(" ON CONFLICT (id) DO NOTHING");
    qb.build().execute(db).await?;

    Ok(())
}

/// Seeds the subject list and returns every subject id
pub async fn seed_subjects(db: &PgPool) -> Result<Vec<i32>, Box<dyn std::error::Error>> {
    println!("📖 Seeding {} subjects...", SUBJECTS.len());

    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO subjects (name) ");
    qb.push_values(SUBJECTS, |mut b, name| {
        b.push_bind(name);
    });
    qb.push(" ON CONFLICT (name) DO NOTHING");
    qb.build().execute(db).await?;

    let ids = sqlx::query_scalar::<_, i32>("SELECT id FROM subjects WHERE name = ANY($1) ORDER BY id")
        .bind(SUBJECTS.to_vec())
        .fetch_all(db)
        .await?;

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_levels_numbers_classes_across_levels() {
        let config = SeedConfig::new(2024).with_levels(2, 3);
        let (levels, classes) = generate_levels(&config);

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].id, "002");
        assert_eq!(classes.len(), 6);
        assert_eq!(classes[3].id, "004");
        assert_eq!(classes[3].level, "002");
        assert_eq!(classes[3].name, "ມ.2/1");
    }
}
