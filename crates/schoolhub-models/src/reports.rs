//! Report sections.
//!
//! Scalar report rows keep snake_case keys. Rows and sections of the composite
//! dashboards use the camelCase keys the admin front end reads
//! (`studentsByGender`, `monthlyPayments`, `regDate`, ...). Field names match
//! the SQL column aliases so rows decode with `FromRow`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use schoolhub_core::serde::{deserialize_filter, deserialize_lenient_i64};

pub const DEFAULT_PERFORMANCE_LIMIT: i64 = 10;

/// Report filters. `all`, an empty value or an absent parameter disables the
/// corresponding condition.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportFilterParams {
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub year_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub level_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub class_id: Option<String>,
    /// Month number 1-12
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub month: Option<i64>,
    /// Rows for student-performance (default 10)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub limit: Option<i64>,
}

impl ReportFilterParams {
    /// The month filter, ignored unless it is 1-12.
    pub fn month(&self) -> Option<i32> {
        self.month
            .filter(|m| (1..=12).contains(m))
            .map(|m| m as i32)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PERFORMANCE_LIMIT).clamp(1, 100)
    }
}

// -- students ---------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct GenderCounts {
    pub male: i64,
    pub female: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct LevelCount {
    pub level: String,
    pub level_id: String,
    pub count: i64,
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct TuitionStatus {
    pub paid: i64,
    pub unpaid: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListRow {
    pub student_id: String,
    pub name: String,
    pub parent_phone: Option<String>,
    /// `dd/mm/yyyy`
    pub dob: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub gender: String,
    pub phone: Option<String>,
    pub level_id: String,
    pub class_id: String,
    pub year_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub students_by_gender: GenderCounts,
    pub students_by_level: Vec<LevelCount>,
    pub tuition_status: TuitionStatus,
    pub student_list: Vec<StudentListRow>,
}

// -- financial --------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct MonthlyPayment {
    #[sqlx(skip)]
    pub month: String,
    pub month_number: i32,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct FinancialRow {
    #[sqlx(skip)]
    pub month: String,
    pub month_number: i32,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    #[serde(rename = "yearId")]
    pub year_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub monthly_payments: Vec<MonthlyPayment>,
    /// Sum of `monthlyPayments.amount`
    pub total_amount: f64,
    pub financial_report: Vec<FinancialRow>,
}

// -- academic ---------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct ClassAverage {
    pub class_name: String,
    pub class_id: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassGradeRow {
    pub student_id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Mean of the registration's exam scores
    pub average: Option<f64>,
    pub level_id: String,
    pub class_id: String,
    pub year_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelGradeRow {
    pub class_id: String,
    pub class_name: String,
    pub students: i64,
    pub avg_score: f64,
    /// Share of students averaging 60 or more, e.g. `"75%"`
    pub pass_rate: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcademicReport {
    pub class_averages: Vec<ClassAverage>,
    pub grades_by_class: Vec<ClassGradeRow>,
    pub grades_by_level: Vec<LevelGradeRow>,
}

// -- trends -----------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
pub struct StudentTrend {
    pub year_name: String,
    pub year_id: String,
    pub student_count: i64,
}

// -- attendance -------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct MonthlyAttendance {
    #[sqlx(skip)]
    pub month: String,
    pub month_number: i32,
    pub present_rate: f64,
    pub absent_rate: f64,
    pub total_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListRow {
    pub student_id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Present share, e.g. `"92%"`
    pub attendance: String,
    /// `dd/mm/yyyy`
    pub last_absent: Option<String>,
    pub level_id: String,
    pub class_id: String,
    pub year_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub attendance: Vec<MonthlyAttendance>,
    pub attendance_list: Vec<AttendanceListRow>,
}

// -- exams ------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct ExamComparison {
    pub subject_name: String,
    pub class_name: String,
    pub average_score: f64,
    pub max_score: f64,
    pub min_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct SubjectScore {
    pub subject_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, ToSchema)]
pub struct StudentPerformance {
    pub student_name: String,
    pub student_id: String,
    pub average_score: f64,
    #[sqlx(skip)]
    pub subjects: Vec<SubjectScore>,
}

// -- registrations ----------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReportRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub id_number: Option<String>,
    pub gender: String,
    pub level: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// `dd/mm/yyyy`
    pub reg_date: String,
    pub paid: bool,
    pub level_id: String,
    pub class_id: String,
    pub year_id: String,
}

// -- composite --------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllReports {
    pub students: StudentReport,
    pub financial: FinancialReport,
    pub academic: AcademicReport,
    pub student_trends: Vec<StudentTrend>,
    pub attendance: AttendanceReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> ReportFilterParams {
        let value: serde_json::Value = serde_json::from_str(query).unwrap();
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_all_and_empty_filters_are_dropped() {
        let p = params(r#"{"year_id":"all","level_id":"","class_id":"A"}"#);
        assert_eq!(p.year_id, None);
        assert_eq!(p.level_id, None);
        assert_eq!(p.class_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_month_out_of_range_is_ignored() {
        assert_eq!(params(r#"{"month":"13"}"#).month(), None);
        assert_eq!(params(r#"{"month":"0"}"#).month(), None);
        assert_eq!(params(r#"{"month":"6"}"#).month(), Some(6));
    }

    #[test]
    fn test_unparseable_month_is_ignored() {
        assert_eq!(params(r#"{"month":"abc"}"#).month(), None);
        assert_eq!(params(r#"{"limit":"ten"}"#).limit(), DEFAULT_PERFORMANCE_LIMIT);
    }

    #[test]
    fn test_limit_default() {
        assert_eq!(params("{}").limit(), DEFAULT_PERFORMANCE_LIMIT);
        assert_eq!(params(r#"{"limit":"3"}"#).limit(), 3);
    }

    #[test]
    fn test_empty_financial_report_shape() {
        let json = serde_json::to_value(FinancialReport::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"monthlyPayments": [], "totalAmount": 0.0, "financialReport": []})
        );
    }
}
