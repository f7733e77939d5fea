use anyhow::Context;
use sqlx::{PgPool, QueryBuilder};
use tracing::instrument;

use schoolhub_core::AppError;
use schoolhub_db::FilterSet;
use schoolhub_models::classes::Class;
use schoolhub_models::common::ClassLookupParams;

pub struct CommonService;

impl CommonService {
    #[instrument(skip(db))]
    pub async fn get_classes(db: &PgPool, params: ClassLookupParams) -> Result<Vec<Class>, AppError> {
        let mut query = QueryBuilder::new("SELECT * FROM classes");
        FilterSet::new()
            .eq("level", params.level_id)
            .push_where(&mut query);
        query.push(" ORDER BY level, name");

        query
            .build_query_as::<Class>()
            .fetch_all(db)
            .await
            .context("Failed to fetch classes")
            .map_err(AppError::database)
    }
}
