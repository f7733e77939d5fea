//! School years, e.g. id `"2024"` covering period `"2024-2025"`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use schoolhub_core::serde::deserialize_optional_date;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct SchoolYear {
    pub id: String,
    pub period: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateSchoolYearDto {
    #[validate(length(min = 1, max = 20, message = "id is required"))]
    pub id: String,
    #[validate(length(min = 1, max = 20, message = "period is required"))]
    #[schema(example = "2024-2025")]
    pub period: String,
    /// Defaults to the period
    pub name: Option<String>,
    /// Defaults to May 1st of the first year of the period
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    /// Defaults to April 30th of the second year of the period
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateSchoolYearDto {
    #[validate(length(min = 1, max = 20, message = "period cannot be empty"))]
    pub period: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}

impl UpdateSchoolYearDto {
    pub fn is_empty(&self) -> bool {
        self.period.is_none()
            && self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_current.is_none()
    }
}

/// Splits `"2024-2025"` into its two years.
pub fn parse_period(period: &str) -> Option<(i32, i32)> {
    let (start, end) = period.trim().split_once('-')?;
    if start.len() != 4 || end.len() != 4 {
        return None;
    }
    let start: i32 = start.parse().ok()?;
    let end: i32 = end.parse().ok()?;
    Some((start, end))
}

/// Default `(start_date, end_date)` for a period: May 1st to April 30th.
pub fn default_dates(period: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = parse_period(period)?;
    Some((
        NaiveDate::from_ymd_opt(start, 5, 1)?,
        NaiveDate::from_ymd_opt(end, 4, 30)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("2024-2025"), Some((2024, 2025)));
        assert_eq!(parse_period(" 2023-2024 "), Some((2023, 2024)));
        assert_eq!(parse_period("2024"), None);
        assert_eq!(parse_period("24-25"), None);
        assert_eq!(parse_period("abcd-efgh"), None);
    }

    #[test]
    fn test_default_dates() {
        let (start, end) = default_dates("2024-2025").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
    }
}
