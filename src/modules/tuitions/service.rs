use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use schoolhub_core::AppError;

use super::model::{CreateTuitionFeeDto, TuitionFee, UpdateTuitionFeeDto};

pub struct TuitionService;

impl TuitionService {
    #[instrument(skip(db))]
    pub async fn get_tuitions(db: &PgPool) -> Result<Vec<TuitionFee>, AppError> {
        sqlx::query_as::<_, TuitionFee>("SELECT * FROM tuition_fees ORDER BY year DESC, level, name")
            .fetch_all(db)
            .await
            .context("Failed to fetch tuition fees")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_tuition(db: &PgPool, id: &str) -> Result<TuitionFee, AppError> {
        sqlx::query_as::<_, TuitionFee>("SELECT * FROM tuition_fees WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch tuition fee")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Tuition fee not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_by_level_and_year(
        db: &PgPool,
        level: &str,
        year: &str,
    ) -> Result<TuitionFee, AppError> {
        sqlx::query_as::<_, TuitionFee>(
            "SELECT * FROM tuition_fees WHERE level = $1 AND year = $2 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(level.trim())
        .bind(year.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch tuition fee by level and year")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("No tuition fee for this level and year"))
        })
    }

    #[instrument(skip(db))]
    pub async fn create_tuition(
        db: &PgPool,
        dto: CreateTuitionFeeDto,
    ) -> Result<TuitionFee, AppError> {
        let id = dto
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        sqlx::query_as::<_, TuitionFee>(
            r#"
            INSERT INTO tuition_fees (id, name, year, level, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(dto.name.trim())
        .bind(dto.year.trim())
        .bind(dto.level.trim())
        .bind(dto.amount)
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_db(e, "Tuition fee ID already exists"))
    }

    #[instrument(skip(db))]
    pub async fn update_tuition(
        db: &PgPool,
        id: &str,
        dto: UpdateTuitionFeeDto,
    ) -> Result<TuitionFee, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        }

        let existing = Self::get_tuition(db, id).await?;

        sqlx::query_as::<_, TuitionFee>(
            r#"
            UPDATE tuition_fees SET name = $1, year = $2, level = $3, amount = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name))
        .bind(dto.year.map(|y| y.trim().to_string()).unwrap_or(existing.year))
        .bind(dto.level.map(|l| l.trim().to_string()).unwrap_or(existing.level))
        .bind(dto.amount.unwrap_or(existing.amount))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to update tuition fee")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Tuition fee not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_tuition(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tuition_fees WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete tuition fee")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Tuition fee not found")));
        }

        Ok(())
    }
}
