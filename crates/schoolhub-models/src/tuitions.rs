//! Tuition fees per level and school year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct TuitionFee {
    pub id: String,
    pub name: String,
    /// School year id
    pub year: String,
    /// Level id
    pub level: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateTuitionFeeDto {
    /// A random UUID string when absent
    #[validate(length(min = 1, max = 50, message = "id cannot be empty"))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "year is required"))]
    pub year: String,
    #[validate(length(min = 1, max = 50, message = "level is required"))]
    pub level: String,
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than 0"))]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateTuitionFeeDto {
    #[validate(length(min = 1, max = 255, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "year cannot be empty"))]
    pub year: Option<String>,
    #[validate(length(min = 1, max = 50, message = "level cannot be empty"))]
    pub level: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than 0"))]
    pub amount: Option<f64>,
}

impl UpdateTuitionFeeDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.year.is_none() && self.level.is_none() && self.amount.is_none()
    }
}
