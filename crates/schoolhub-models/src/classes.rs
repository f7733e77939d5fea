//! Classrooms. Every class belongs to a level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use schoolhub_core::serde::deserialize_filter;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct Class {
    pub id: String,
    pub name: String,
    /// Level id
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 50, message = "id cannot be empty"))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "level is required"))]
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "level cannot be empty"))]
    pub level: Option<String>,
}

impl UpdateClassDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.level.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub level: Option<String>,
}
