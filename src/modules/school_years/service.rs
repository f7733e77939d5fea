use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use schoolhub_core::AppError;

use super::model::{CreateSchoolYearDto, SchoolYear, UpdateSchoolYearDto, default_dates};

const DUPLICATE_YEAR: &str = "School year ID or period already exists";

pub struct SchoolYearService;

impl SchoolYearService {
    #[instrument(skip(db))]
    pub async fn get_school_years(db: &PgPool) -> Result<Vec<SchoolYear>, AppError> {
        sqlx::query_as::<_, SchoolYear>("SELECT * FROM school_years ORDER BY start_date DESC")
            .fetch_all(db)
            .await
            .context("Failed to fetch school years")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_school_year(db: &PgPool, id: &str) -> Result<SchoolYear, AppError> {
        sqlx::query_as::<_, SchoolYear>("SELECT * FROM school_years WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch school year")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("School year not found")))
    }

    #[instrument(skip(db))]
    pub async fn create_school_year(
        db: &PgPool,
        dto: CreateSchoolYearDto,
    ) -> Result<SchoolYear, AppError> {
        let period = dto.period.trim().to_string();
        let (start_date, end_date) = match (dto.start_date, dto.end_date) {
            (Some(start), Some(end)) => (start, end),
            (start, end) => {
                let (default_start, default_end) = default_dates(&period).ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!(
                        "period must look like YYYY-YYYY when dates are omitted"
                    ))
                })?;
                (start.unwrap_or(default_start), end.unwrap_or(default_end))
            }
        };
        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| period.clone());

        let mut tx = db.begin().await.map_err(AppError::database)?;
        if dto.is_current {
            Self::clear_current(&mut *tx, None).await?;
        }

        let year = sqlx::query_as::<_, SchoolYear>(
            r#"
            INSERT INTO school_years (id, period, name, start_date, end_date, is_current)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(dto.id.trim())
        .bind(&period)
        .bind(&name)
        .bind(start_date)
        .bind(end_date)
        .bind(dto.is_current)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_YEAR))?;

        tx.commit().await.map_err(AppError::database)?;
        Ok(year)
    }

    #[instrument(skip(db))]
    pub async fn update_school_year(
        db: &PgPool,
        id: &str,
        dto: UpdateSchoolYearDto,
    ) -> Result<SchoolYear, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        }

        let existing = Self::get_school_year(db, id).await?;
        let is_current = dto.is_current.unwrap_or(existing.is_current);

        let mut tx = db.begin().await.map_err(AppError::database)?;
        if is_current {
            Self::clear_current(&mut *tx, Some(id)).await?;
        }

        let year = sqlx::query_as::<_, SchoolYear>(
            r#"
            UPDATE school_years SET
                period = $1, name = $2, start_date = $3, end_date = $4,
                is_current = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(dto.period.map(|p| p.trim().to_string()).unwrap_or(existing.period))
        .bind(dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name))
        .bind(dto.start_date.unwrap_or(existing.start_date))
        .bind(dto.end_date.unwrap_or(existing.end_date))
        .bind(is_current)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_YEAR))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("School year not found")))?;

        tx.commit().await.map_err(AppError::database)?;
        Ok(year)
    }

    #[instrument(skip(db))]
    pub async fn delete_school_year(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM school_years WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete school year")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("School year not found")));
        }

        Ok(())
    }

    /// Only one year may be current.
    async fn clear_current(conn: &mut PgConnection, except: Option<&str>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE school_years SET is_current = false, updated_at = NOW()
            WHERE is_current AND ($1::text IS NULL OR id <> $1)
            "#,
        )
        .bind(except)
        .execute(conn)
        .await
        .context("Failed to clear current school year")
        .map_err(AppError::database)?;
        Ok(())
    }
}
