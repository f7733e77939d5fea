use std::collections::BTreeMap;

use anyhow::Context;
use chrono::Utc;
use sqlx::{PgExecutor, PgPool, QueryBuilder};
use tracing::instrument;

use schoolhub_core::AppError;
use schoolhub_db::{FilterSet, Sequence};
use schoolhub_models::students::CreateStudentDto;

use super::model::{
    ClassRoster, ClassRosterParams, CreateRegistrationDto, RegistrationFilterParams,
    RegistrationListResponse, RegistrationView, RosterEntry, UpdateRegistrationDto,
};
use crate::modules::students::service::StudentService;

const VIEW_SELECT: &str = r#"
    SELECT r.id, r.registration_date, r.student_id, r.classroom, r.level, r.school_year,
           r.paid, s.student_name_lao AS student_name,
           COALESCE(s.phone_number, s.guardian_phone) AS student_phone,
           r.created_at, r.updated_at
    FROM registrations r
    LEFT JOIN students s ON s.student_id = r.student_id
"#;

#[derive(sqlx::FromRow)]
struct RosterRow {
    classroom: String,
    level: String,
    registration_id: String,
    student_id: String,
    student_name: Option<String>,
    paid: bool,
}

pub struct RegistrationService;

impl RegistrationService {
    fn filters(params: &RegistrationFilterParams) -> FilterSet {
        FilterSet::new()
            .search(
                &["r.student_id", "s.student_name_lao", "r.id"],
                params.search.clone(),
            )
            .eq("r.school_year", params.school_year.clone())
            .eq("r.paid", params.paid)
    }

    #[instrument(skip(db))]
    pub async fn get_registrations(
        db: &PgPool,
        params: RegistrationFilterParams,
    ) -> Result<RegistrationListResponse, AppError> {
        let filters = Self::filters(&params);

        let mut count = QueryBuilder::new(
            "SELECT COUNT(*) FROM registrations r LEFT JOIN students s ON s.student_id = r.student_id",
        );
        filters.push_where(&mut count);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(db)
            .await
            .context("Failed to count registrations")
            .map_err(AppError::database)?;

        let mut query = QueryBuilder::new(VIEW_SELECT);
        filters.push_where(&mut query);
        query
            .push(" ORDER BY r.registration_date DESC, r.id DESC LIMIT ")
            .push_bind(params.pagination.limit())
            .push(" OFFSET ")
            .push_bind(params.pagination.offset());

        let registrations = query
            .build_query_as::<RegistrationView>()
            .fetch_all(db)
            .await
            .context("Failed to fetch registrations")
            .map_err(AppError::database)?;

        Ok(RegistrationListResponse {
            registrations,
            total,
        })
    }

    /// Invoice id the next enrollment would receive. Nothing is reserved.
    #[instrument(skip(db))]
    pub async fn current_id(db: &PgPool) -> Result<String, AppError> {
        Sequence::INVOICES
            .peek_id(db)
            .await
            .context("Failed to compute next invoice ID")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_registration(db: &PgPool, id: &str) -> Result<RegistrationView, AppError> {
        Self::find_view(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))
    }

    async fn find_view<'e, E>(executor: E, id: &str) -> Result<Option<RegistrationView>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{VIEW_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, RegistrationView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .context("Failed to fetch registration")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn students_by_class(
        db: &PgPool,
        params: ClassRosterParams,
    ) -> Result<Vec<ClassRoster>, AppError> {
        let filters = FilterSet::new()
            .eq("r.school_year", params.school_year)
            .eq("r.level", params.level);

        let mut query = QueryBuilder::new(
            r#"
            SELECT r.classroom, r.level, r.id AS registration_id, r.student_id,
                   s.student_name_lao AS student_name, r.paid
            FROM registrations r
            LEFT JOIN students s ON s.student_id = r.student_id
            "#,
        );
        filters.push_where(&mut query);
        query.push(" ORDER BY r.classroom, r.level, r.student_id");

        let rows = query
            .build_query_as::<RosterRow>()
            .fetch_all(db)
            .await
            .context("Failed to fetch class rosters")
            .map_err(AppError::database)?;

        Ok(group_rosters(rows))
    }

    /// Enrolls a student, creating the student record first when
    /// `student_id` is unknown. The invoice id is allocated under the
    /// sequence lock so concurrent enrollments never share one.
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id))]
    pub async fn create_registration(
        db: &PgPool,
        dto: CreateRegistrationDto,
    ) -> Result<RegistrationView, AppError> {
        let student_id = dto.student_id.trim().to_string();
        if student_id.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("student_id is required")));
        }

        let mut tx = db
            .begin()
            .await
            .context("Failed to start registration transaction")
            .map_err(AppError::database)?;

        let invoice_id = Sequence::INVOICES
            .next_id(&mut *tx)
            .await
            .context("Failed to allocate invoice ID")
            .map_err(AppError::database)?;

        let existing = StudentService::find_by_student_id(&mut *tx, &student_id).await?;
        let new_student = existing.is_none();

        if new_student {
            let name = dto.student_name();
            if name.is_none() {
                tracing::warn!(student_id = %student_id, "enrollment created a student without a name");
            }
            let student = CreateStudentDto {
                student_id: Some(student_id.clone()),
                student_name_lao: name.unwrap_or_default().to_string(),
                gender: dto.gender.unwrap_or_default(),
                phone_number: dto.student_phone.clone(),
                ..Default::default()
            };
            let created = StudentService::insert_student(&mut *tx, student).await?;
            tracing::info!(student_id = %created.student_id, "created student during enrollment");
        }

        let registration_date = dto
            .registration_date
            .unwrap_or_else(|| Utc::now().date_naive());

        sqlx::query(
            r#"
            INSERT INTO registrations (id, registration_date, student_id, classroom, level, school_year, paid)
            VALUES ($1, $2, $3, $4, $5, $6, false)
            "#,
        )
        .bind(&invoice_id)
        .bind(registration_date)
        .bind(&student_id)
        .bind(dto.classroom.trim())
        .bind(dto.level.trim())
        .bind(dto.school_year.trim())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Student does not exist"))?;

        let registration = Self::find_view(&mut *tx, &invoice_id)
            .await?
            .ok_or_else(|| AppError::internal(anyhow::anyhow!("Registration vanished after insert")))?;

        tx.commit()
            .await
            .context("Failed to commit registration")
            .map_err(AppError::database)?;

        crate::metrics::track_registration_created(new_student);
        Ok(registration)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_registration(
        db: &PgPool,
        id: &str,
        dto: UpdateRegistrationDto,
    ) -> Result<RegistrationView, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        }

        let existing = Self::get_registration(db, id).await?;

        let result = sqlx::query(
            r#"
            UPDATE registrations SET
                student_id = $1, classroom = $2, level = $3, school_year = $4,
                paid = $5, registration_date = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(dto.student_id.map(|s| s.trim().to_string()).unwrap_or(existing.student_id))
        .bind(dto.classroom.map(|s| s.trim().to_string()).unwrap_or(existing.classroom))
        .bind(dto.level.map(|s| s.trim().to_string()).unwrap_or(existing.level))
        .bind(dto.school_year.map(|s| s.trim().to_string()).unwrap_or(existing.school_year))
        .bind(dto.paid.unwrap_or(existing.paid))
        .bind(dto.registration_date.unwrap_or(existing.registration_date))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| AppError::from_db(e, "Student does not exist"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Registration not found")));
        }

        Self::get_registration(db, id).await
    }

    /// Payments go with the registration via `ON DELETE CASCADE`.
    #[instrument(skip(db))]
    pub async fn delete_registration(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete registration")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Registration not found")));
        }

        Ok(())
    }
}

/// Folds rows sorted by classroom into one roster per (classroom, level).
fn group_rosters(rows: Vec<RosterRow>) -> Vec<ClassRoster> {
    let mut grouped: BTreeMap<(String, String), Vec<RosterEntry>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry((row.classroom, row.level))
            .or_default()
            .push(RosterEntry {
                registration_id: row.registration_id,
                student_id: row.student_id,
                student_name: row.student_name,
                paid: row.paid,
            });
    }

    grouped
        .into_iter()
        .map(|((classroom, level), students)| ClassRoster {
            classroom,
            level,
            students,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(classroom: &str, level: &str, id: &str) -> RosterRow {
        RosterRow {
            classroom: classroom.into(),
            level: level.into(),
            registration_id: id.into(),
            student_id: format!("S-{id}"),
            student_name: None,
            paid: false,
        }
    }

    #[test]
    fn test_group_rosters_by_classroom() {
        let rosters = group_rosters(vec![
            row("A", "1", "INV-001"),
            row("A", "1", "INV-002"),
            row("B", "2", "INV-003"),
        ]);

        assert_eq!(rosters.len(), 2);
        assert_eq!(rosters[0].classroom, "A");
        assert_eq!(rosters[0].students.len(), 2);
        assert_eq!(rosters[1].classroom, "B");
        assert_eq!(rosters[1].students[0].registration_id, "INV-003");
    }

    #[test]
    fn test_group_rosters_empty() {
        assert!(group_rosters(Vec::new()).is_empty());
    }
}
