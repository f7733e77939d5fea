//! Enrollment records.
//!
//! A registration places a student in a classroom, level and school year
//! and carries the invoice id (`INV-NNN`) and paid flag.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use schoolhub_core::PaginationParams;
use schoolhub_core::serde::{deserialize_filter, deserialize_optional_bool, deserialize_optional_date};

use crate::students::Gender;
use crate::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct Registration {
    pub id: String,
    pub registration_date: NaiveDate,
    pub student_id: String,
    pub classroom: String,
    pub level: String,
    pub school_year: String,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration joined with the student's name and phone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct RegistrationView {
    pub id: String,
    pub registration_date: NaiveDate,
    pub student_id: String,
    pub classroom: String,
    pub level: String,
    pub school_year: String,
    pub paid: bool,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment form.
///
/// When no student exists for `student_id`, one is created from
/// `student_name`, `student_phone` and `gender` (default `M`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateRegistrationDto {
    #[validate(
        length(min = 1, max = 50, message = "student_id is required"),
        custom(function = "not_blank", message = "student_id is required")
    )]
    pub student_id: String,
    #[validate(
        length(min = 1, max = 50, message = "classroom is required"),
        custom(function = "not_blank", message = "classroom is required")
    )]
    pub classroom: String,
    #[validate(
        length(min = 1, max = 50, message = "level is required"),
        custom(function = "not_blank", message = "level is required")
    )]
    pub level: String,
    #[validate(
        length(min = 1, max = 50, message = "school_year is required"),
        custom(function = "not_blank", message = "school_year is required")
    )]
    pub school_year: String,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub registration_date: Option<NaiveDate>,
}

impl CreateRegistrationDto {
    /// The form's student name, if it holds anything besides whitespace.
    pub fn student_name(&self) -> Option<&str> {
        self.student_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateRegistrationDto {
    #[validate(length(min = 1, max = 50, message = "student_id cannot be empty"))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, max = 50, message = "classroom cannot be empty"))]
    pub classroom: Option<String>,
    #[validate(length(min = 1, max = 50, message = "level cannot be empty"))]
    pub level: Option<String>,
    #[validate(length(min = 1, max = 50, message = "school_year cannot be empty"))]
    pub school_year: Option<String>,
    pub paid: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub registration_date: Option<NaiveDate>,
}

impl UpdateRegistrationDto {
    pub fn is_empty(&self) -> bool {
        self.student_id.is_none()
            && self.classroom.is_none()
            && self.level.is_none()
            && self.school_year.is_none()
            && self.paid.is_none()
            && self.registration_date.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RegistrationFilterParams {
    /// Matches student_id, student name or invoice id
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub school_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub paid: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationListResponse {
    pub registrations: Vec<RegistrationView>,
    pub total: i64,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassRosterParams {
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub school_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct RosterEntry {
    pub registration_id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub paid: bool,
}

/// Students enrolled in one classroom.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ClassRoster {
    pub classroom: String,
    pub level: String,
    pub students: Vec<RosterEntry>,
}
