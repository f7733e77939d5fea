//! Student, registration and payment seeding.
//!
//! Students are generated in parallel with Rayon, then inserted in batches.
//! Student ids and invoice ids come from the same allocator the API uses, so
//! seeded rows continue the existing sequences.

use chrono::{Duration, NaiveDate};
use fake::faker::address::en::{CityName, StateName, StreetName};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::{Fake, Faker};
use rayon::prelude::*;
use schoolhub_db::Sequence;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Instant;

use super::models::{ClassSeed, PaymentSeed, RegistrationSeed, SeedConfig, StudentSeed};

const BATCH_SIZE: usize = 1000;

/// Generates students for every class
pub fn generate_students(config: &SeedConfig, class_count: usize) -> Vec<StudentSeed> {
    let per_class = config.students_per_class;
    let birth_years = (config.start_year - 18)..(config.start_year - 10);

    (0..class_count * per_class)
        .into_par_iter()
        .map(|i| {
            let year: i32 = birth_years.clone().fake();
            let month: u32 = (1..13).fake();
            let day: u32 = (1..29).fake();
            let has_phone: bool = Faker.fake();

            StudentSeed {
                student_name_lao: Name().fake(),
                gender: if Faker.fake::<bool>() { "M" } else { "F" },
                guardian_phone: PhoneNumber().fake(),
                phone_number: has_phone.then(|| PhoneNumber().fake()),
                province: StateName().fake(),
                district: CityName().fake(),
                village: StreetName().fake(),
                date_of_birth: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
                class_idx: i / per_class.max(1),
                paid: (0..10).fake::<u8>() < 7,
            }
        })
        .collect()
}

/// Seeds students and one registration each; returns the registrations
pub async fn seed_students(
    db: &PgPool,
    config: &SeedConfig,
    classes: &[ClassSeed],
) -> Result<Vec<RegistrationSeed>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let students = generate_students(config, classes.len());
    println!(
        "👩‍🎓 Seeding {} students ({} per class)...",
        students.len(),
        config.students_per_class
    );

    if students.is_empty() {
        return Ok(Vec::new());
    }

    let school_start = NaiveDate::from_ymd_opt(config.start_year, 5, 1).ok_or("invalid start year")?;

    let mut tx = db.begin().await?;

    let first_student = first_number(&Sequence::STUDENTS, &mut tx).await?;
    let first_invoice = first_number(&Sequence::INVOICES, &mut tx).await?;

    let registrations: Vec<RegistrationSeed> = students
        .par_iter()
        .enumerate()
        .map(|(i, student)| {
            let class = &classes[student.class_idx.min(classes.len() - 1)];
            RegistrationSeed {
                id: Sequence::INVOICES.format(first_invoice + i as u64),
                student_id: Sequence::STUDENTS.format(first_student + i as u64),
                classroom: class.id.clone(),
                level: class.level.clone(),
                registration_date: school_start + Duration::days((0..60).fake::<i64>()),
                paid: student.paid,
            }
        })
        .collect();

    for (students, registrations) in students
        .chunks(BATCH_SIZE)
        .zip(registrations.chunks(BATCH_SIZE))
    {
        insert_students_chunk(&mut tx, students, registrations).await?;
        insert_registrations_chunk(&mut tx, registrations, &config.year_id()).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students and registrations in {:?}",
        registrations.len(),
        start_time.elapsed()
    );

    Ok(registrations)
}

/// Reserves the start of a block of ids. The advisory lock is held until the
/// transaction that inserts the block commits.
async fn first_number(
    sequence: &Sequence,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<u64, Box<dyn std::error::Error>> {
    let id = sequence.next_id(&mut **tx).await?;
    sequence
        .parse(&id)
        .ok_or_else(|| format!("allocator returned malformed id {id}").into())
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
    registrations: &[RegistrationSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if students.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO students (student_id, student_name_lao, gender, guardian_phone, phone_number, province, district, village, date_of_birth) ",
    );
    qb.push_values(students.iter().zip(registrations), |mut b, (student, registration)| {
        b.push_bind(registration.student_id.clone())
            .push_bind(student.student_name_lao.clone())
            .push_bind(student.gender)
            .push_bind(student.guardian_phone.clone())
            .push_bind(student.phone_number.clone())
            .push_bind(student.province.clone())
            .push_bind(student.district.clone())
            .push_bind(student.village.clone())
            .push_bind(student.date_of_birth);
    });
    qb.build().execute(&mut **tx).await?;

    Ok(())
}

async fn insert_registrations_chunk(
    tx: &mut Transaction<'_, Postgres>,
    registrations: &[RegistrationSeed],
    school_year: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if registrations.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO registrations (id, student_id, classroom, level, school_year, registration_date, paid) ",
    );
    qb.push_values(registrations, |mut b, registration| {
        b.push_bind(registration.id.clone())
            .push_bind(registration.student_id.clone())
            .push_bind(registration.classroom.clone())
            .push_bind(registration.level.clone())
            .push_bind(school_year.to_string())
            .push_bind(registration.registration_date)
            .push_bind(registration.paid);
    });
    qb.build().execute(&mut **tx).await?;

    Ok(())
}

/// One full tuition payment per paid registration
pub fn generate_payments(registrations: &[RegistrationSeed], tuition: f64) -> Vec<PaymentSeed> {
    registrations
        .par_iter()
        .filter(|r| r.paid)
        .map(|r| PaymentSeed {
            registration_id: r.id.clone(),
            amount: tuition,
            payment_date: r.registration_date + Duration::days((0..14).fake::<i64>()),
            payment_method: if (0..4).fake::<u8>() == 0 {
                "bank_transfer"
            } else {
                "cash"
            },
            receipt_number: format!("RC-{}", r.id.trim_start_matches("INV-")),
        })
        .collect()
}

/// Seeds payments for the paid registrations
pub async fn seed_payments(
    db: &PgPool,
    registrations: &[RegistrationSeed],
    tuition: f64,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let payments = generate_payments(registrations, tuition);
    println!("💵 Seeding {} payments...", payments.len());

    let mut tx = db.begin().await?;

    for chunk in payments.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO payments (registration_id, amount, payment_date, payment_method, receipt_number) ",
        );
        qb.push_values(chunk, |mut b, payment| {
            b.push_bind(payment.registration_id.clone())
                .push_bind(payment.amount)
                .push_bind(payment.payment_date)
                .push_bind(payment.payment_method)
                .push_bind(payment.receipt_number.clone());
        });
        qb.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} payments in {:?}",
        payments.len(),
        start_time.elapsed()
    );

    Ok(payments.len())
}
