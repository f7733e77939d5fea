//! Student records.
//!
//! `id` is the surrogate UUID; `student_id` is the human-readable natural key
//! that registrations reference.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use schoolhub_core::PaginationParams;
use schoolhub_core::serde::{deserialize_filter, deserialize_optional_date};

pub const DEFAULT_NATIONALITY: &str = "ລາວ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    #[default]
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub student_id: String,
    pub student_name_lao: String,
    pub guardian_phone: Option<String>,
    pub gender: String,
    pub province: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
    pub id_number: Option<String>,
    pub id_issued_date: Option<NaiveDate>,
    pub birth_village: Option<String>,
    pub birth_district: Option<String>,
    pub birth_province: Option<String>,
    pub ethnicity: Option<String>,
    pub religion: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    /// Allocated from the student sequence when absent
    #[validate(length(min = 1, max = 50, message = "student_id cannot be empty"))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "student_name_lao is required"))]
    pub student_name_lao: String,
    pub gender: Gender,
    pub guardian_phone: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
    pub id_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub id_issued_date: Option<NaiveDate>,
    pub birth_village: Option<String>,
    pub birth_district: Option<String>,
    pub birth_province: Option<String>,
    pub ethnicity: Option<String>,
    pub religion: Option<String>,
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
}

/// Partial update; only present fields change.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 50, message = "student_id cannot be empty"))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "student_name_lao cannot be empty"))]
    pub student_name_lao: Option<String>,
    pub gender: Option<Gender>,
    pub guardian_phone: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
    pub id_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub id_issued_date: Option<NaiveDate>,
    pub birth_village: Option<String>,
    pub birth_district: Option<String>,
    pub birth_province: Option<String>,
    pub ethnicity: Option<String>,
    pub religion: Option<String>,
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Matches student_id, name or phone (case-insensitive)
    pub search: Option<String>,
    /// `M`, `F` or `all`
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub gender: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
    pub total: i64,
}
