//! Academic and financial records read by the reports: exams, attendances
//! and income/expense transactions.

use chrono::{Datelike, Duration, NaiveDate};
use fake::Fake;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::{AttendanceSeed, ExamSeed, RegistrationSeed, SeedConfig, TransactionSeed};

const BATCH_SIZE: usize = 2000;

/// Days of attendance recorded per registration.
const ATTENDANCE_DAYS: i64 = 20;

/// One score per subject per registration, mostly passing.
pub fn generate_exams(
    registrations: &[RegistrationSeed],
    subject_ids: &[i32],
    exam_date: NaiveDate,
) -> Vec<ExamSeed> {
    registrations
        .par_iter()
        .flat_map_iter(|r| {
            subject_ids.iter().map(move |&subject_id| ExamSeed {
                registration_id: r.id.clone(),
                subject_id,
                score: (35..101).fake::<u32>() as f64,
                exam_date,
            })
        })
        .collect()
}

/// School days from `from`, skipping weekends.
pub fn school_days(from: NaiveDate, count: i64) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count as usize);
    let mut day = from;
    while (days.len() as i64) < count {
        if day.weekday().number_from_monday() <= 5 {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

pub fn generate_attendances(registrations: &[RegistrationSeed], days: &[NaiveDate]) -> Vec<AttendanceSeed> {
    registrations
        .par_iter()
        .flat_map_iter(|r| {
            days.iter().map(move |&date| {
                let roll: u8 = (0..100).fake();
                AttendanceSeed {
                    registration_id: r.id.clone(),
                    date,
                    status: match roll {
                        0..=84 => "present",
                        85..=92 => "late",
                        _ => "absent",
                    },
                }
            })
        })
        .collect()
}

/// Monthly income and expense entries across the school year.
pub fn generate_transactions(config: &SeedConfig) -> Vec<TransactionSeed> {
    (0..12)
        .filter_map(|offset| {
            let month0 = 4 + offset;
            let year = config.start_year + month0 / 12;
            NaiveDate::from_ymd_opt(year, (month0 % 12 + 1) as u32, 15)
        })
        .flat_map(|date| {
            let income = (20_000_000..60_000_000).fake::<u32>() as f64;
            let expense = (10_000_000..40_000_000).fake::<u32>() as f64;
            [
                TransactionSeed {
                    transaction_date: date,
                    kind: "income",
                    amount: income,
                    description: "ລາຍຮັບປະຈຳເດືອນ".to_string(),
                },
                TransactionSeed {
                    transaction_date: date,
                    kind: "expense",
                    amount: expense,
                    description: "ລາຍຈ່າຍປະຈຳເດືອນ".to_string(),
                },
            ]
        })
        .collect()
}

/// Seeds exams, attendances and financial transactions
pub async fn seed_records(
    db: &PgPool,
    config: &SeedConfig,
    registrations: &[RegistrationSeed],
    subject_ids: &[i32],
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let term_start =
        NaiveDate::from_ymd_opt(config.start_year, 9, 1).ok_or("invalid start year")?;
    let exams = generate_exams(registrations, subject_ids, term_start + Duration::days(60));
    let attendances = generate_attendances(registrations, &school_days(term_start, ATTENDANCE_DAYS));
    let transactions = generate_transactions(config);

    println!(
        "📝 Seeding {} exam scores, {} attendance rows and {} transactions...",
        exams.len(),
        attendances.len(),
        transactions.len()
    );

    let mut tx = db.begin().await?;

    for chunk in exams.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO exams (registration_id, subject_id, score, exam_date) ",
        );
        qb.push_values(chunk, |mut b, exam| {
            b.push_bind(exam.registration_id.clone())
                .push_bind(exam.subject_id)
                .push_bind(exam.score)
                .push_bind(exam.exam_date);
        });
        qb.build().execute(&mut *tx).await?;
    }

    for chunk in attendances.chunks(BATCH_SIZE) {
        let mut qb =
            QueryBuilder::<Postgres>::new("INSERT INTO attendances (registration_id, date, status) ");
        qb.push_values(chunk, |mut b, attendance| {
            b.push_bind(attendance.registration_id.clone())
                .push_bind(attendance.date)
                .push_bind(attendance.status);
        });
        qb.build().execute(&mut *tx).await?;
    }

    if !transactions.is_empty() {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO financial_transactions (transaction_date, type, amount, academic_year_id, description) ",
        );
        qb.push_values(&transactions, |mut b, t| {
            b.push_bind(t.transaction_date)
                .push_bind(t.kind)
                .push_bind(t.amount)
                .push_bind(config.year_id())
                .push_bind(t.description.clone());
        });
        qb.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!("   ✓ Inserted records in {:?}", start_time.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_school_days_skip_weekends() {
        // 2024-09-06 is a Friday
        let from = NaiveDate::from_ymd_opt(2024, 9, 6).unwrap();
        let days = school_days(from, 3);
        assert_eq!(
            days,
            vec![
                from,
                NaiveDate::from_ymd_opt(2024, 9, 9).unwrap(),
                NaiveDate::from_ymd_opt(2024, 9, 10).unwrap(),
            ]
        );
    }

    #[test]
    fn test_transactions_cover_school_year() {
        let transactions = generate_transactions(&SeedConfig::new(2024));
        assert_eq!(transactions.len(), 24);
        assert_eq!(
            transactions[0].transaction_date,
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
        );
        assert_eq!(
            transactions[23].transaction_date,
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
    }

    #[test]
    fn test_exam_scores_in_range() {
        let registration = RegistrationSeed {
            id: "INV-001".into(),
            student_id: "001".into(),
            classroom: "001".into(),
            level: "001".into(),
            registration_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            paid: false,
        };
        let exams = generate_exams(
            &[registration],
            &[1, 2, 3],
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
        );
        assert_eq!(exams.len(), 3);
        assert!(exams.iter().all(|e| (35.0..=100.0).contains(&e.score)));
    }
}
