use anyhow::Context;
use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;

use schoolhub_core::AppError;
use schoolhub_db::{FilterSet, Sequence};

use crate::modules::classes::model::{Class, ClassFilterParams, CreateClassDto, UpdateClassDto};

const CLASS_CONFLICT: &str = "Class ID already exists or level does not exist";

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db))]
    pub async fn get_classes(db: &PgPool, params: ClassFilterParams) -> Result<Vec<Class>, AppError> {
        let mut query = QueryBuilder::new("SELECT * FROM classes");
        FilterSet::new()
            .eq("level", params.level)
            .push_where(&mut query);
        query.push(" ORDER BY id");

        query
            .build_query_as::<Class>()
            .fetch_all(db)
            .await
            .context("Failed to fetch classes")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, id: &str) -> Result<Class, AppError> {
        sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch class")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))
    }

    #[instrument(skip(db))]
    pub async fn current_id(db: &PgPool) -> Result<String, AppError> {
        Sequence::CLASSES
            .peek_id(db)
            .await
            .context("Failed to compute next class ID")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let mut tx = db.begin().await.map_err(AppError::database)?;

        let id = match dto.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Sequence::CLASSES
                .next_id(&mut *tx)
                .await
                .context("Failed to allocate class ID")
                .map_err(AppError::database)?,
        };

        let class = sqlx::query_as::<_, Class>(
            "INSERT INTO classes (id, name, level) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&id)
        .bind(dto.name.trim())
        .bind(dto.level.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, CLASS_CONFLICT))?;

        tx.commit().await.map_err(AppError::database)?;
        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn update_class(
        db: &PgPool,
        id: &str,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!("No fields to update")));
        }

        let existing = Self::get_class(db, id).await?;

        sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes SET name = $1, level = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name))
        .bind(dto.level.map(|l| l.trim().to_string()).unwrap_or(existing.level))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| AppError::from_db(e, "Level does not exist"))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete class")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        Ok(())
    }
}
