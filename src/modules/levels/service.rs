use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use schoolhub_core::AppError;
use schoolhub_db::Sequence;

use crate::modules::levels::model::{CreateLevelDto, Level, UpdateLevelDto};

pub struct LevelService;

impl LevelService {
    #[instrument(skip(db))]
    pub async fn get_levels(db: &PgPool) -> Result<Vec<Level>, AppError> {
        sqlx::query_as::<_, Level>("SELECT * FROM levels ORDER BY id")
            .fetch_all(db)
            .await
            .context("Failed to fetch levels")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_level(db: &PgPool, id: &str) -> Result<Level, AppError> {
        sqlx::query_as::<_, Level>("SELECT * FROM levels WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch level")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Level not found")))
    }

    #[instrument(skip(db))]
    pub async fn current_id(db: &PgPool) -> Result<String, AppError> {
        Sequence::LEVELS
            .peek_id(db)
            .await
            .context("Failed to compute next level ID")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn create_level(db: &PgPool, dto: CreateLevelDto) -> Result<Level, AppError> {
        let mut tx = db.begin().await.map_err(AppError::database)?;

        let id = match dto.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Sequence::LEVELS
                .next_id(&mut *tx)
                .await
                .context("Failed to allocate level ID")
                .map_err(AppError::database)?,
        };

        let level = sqlx::query_as::<_, Level>(
            "INSERT INTO levels (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(&id)
        .bind(dto.name.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Level ID already exists"))?;

        tx.commit().await.map_err(AppError::database)?;
        Ok(level)
    }

    #[instrument(skip(db))]
    pub async fn update_level(
        db: &PgPool,
        id: &str,
        dto: UpdateLevelDto,
    ) -> Result<Level, AppError> {
        let Some(name) = dto.name else {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        };

        sqlx::query_as::<_, Level>(
            "UPDATE levels SET name = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(name.trim())
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to update level")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Level not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_level(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM levels WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| AppError::from_db(e, "Level has classes and cannot be deleted"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Level not found")));
        }

        Ok(())
    }
}
