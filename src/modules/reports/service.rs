//! Dashboard aggregations.
//!
//! Every section runs its own query. A failing query is logged and the
//! section comes back empty so one broken table never takes down a whole
//! dashboard.

use std::collections::HashMap;
use std::future::Future;

use sqlx::{FromRow, PgPool, QueryBuilder};
use tracing::instrument;

use schoolhub_db::FilterSet;

use super::model::{
    AcademicReport, AllReports, AttendanceListRow, AttendanceReport, ClassAverage, ClassGradeRow,
    ExamComparison, FinancialReport, FinancialRow, GenderCounts, LevelCount, LevelGradeRow,
    MonthlyAttendance, MonthlyPayment, RegistrationReportRow, ReportFilterParams,
    StudentListRow, StudentPerformance, StudentReport, StudentTrend, SubjectScore, TuitionStatus,
};
use super::months::lao_month_name;

/// Mean exam score per registration.
const REGISTRATION_SCORES: &str = r#"
    WITH reg_scores AS (
        SELECT registration_id, AVG(score) AS avg_score
        FROM exams
        GROUP BY registration_id
    )
"#;

const GENDER_LABEL: &str =
    "CASE s.gender WHEN 'M' THEN 'ຊາຍ' WHEN 'F' THEN 'ຍິງ' ELSE s.gender END";

#[derive(FromRow)]
struct SubjectScoreRow {
    student_id: String,
    subject_name: String,
    score: f64,
}

/// Runs one report query, swapping a failure for an empty section.
async fn degrade<T, F>(section: &'static str, query: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match query.await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(section, error = %error, "report query failed, returning empty section");
            crate::metrics::track_report_degraded(section);
            T::default()
        }
    }
}

fn registration_filters(params: &ReportFilterParams) -> FilterSet {
    FilterSet::new()
        .eq("r.school_year", params.year_id.clone())
        .eq("r.level", params.level_id.clone())
        .eq("r.classroom", params.class_id.clone())
}

fn year_and_level(params: &ReportFilterParams) -> FilterSet {
    FilterSet::new()
        .eq("r.school_year", params.year_id.clone())
        .eq("r.level", params.level_id.clone())
}

pub struct ReportService;

impl ReportService {
    #[instrument(skip(db))]
    pub async fn students(db: &PgPool, params: &ReportFilterParams) -> StudentReport {
        let (students_by_gender, students_by_level, tuition_status, student_list) = tokio::join!(
            degrade("students_by_gender", Self::students_by_gender(db, params)),
            degrade("students_by_level", Self::students_by_level(db, params)),
            degrade("tuition_status", Self::tuition_status(db, params)),
            degrade("student_list", Self::student_list(db, params)),
        );

        StudentReport {
            students_by_gender,
            students_by_level,
            tuition_status,
            student_list,
        }
    }

    #[instrument(skip(db))]
    pub async fn financial(db: &PgPool, params: &ReportFilterParams) -> FinancialReport {
        let (monthly_payments, financial_report) = tokio::join!(
            degrade("monthly_payments", Self::monthly_payments(db, params)),
            degrade("financial_report", Self::financial_rows(db, params)),
        );
        let total_amount = monthly_payments.iter().map(|m| m.amount).sum();

        FinancialReport {
            monthly_payments,
            total_amount,
            financial_report,
        }
    }

    #[instrument(skip(db))]
    pub async fn academic(db: &PgPool, params: &ReportFilterParams) -> AcademicReport {
        let (class_averages, grades_by_class, grades_by_level) = tokio::join!(
            degrade("class_averages", Self::class_averages(db, params)),
            degrade("grades_by_class", Self::grades_by_class(db, params)),
            degrade("grades_by_level", Self::grades_by_level(db, params)),
        );

        AcademicReport {
            class_averages,
            grades_by_class,
            grades_by_level,
        }
    }

    #[instrument(skip(db))]
    pub async fn student_trends(db: &PgPool, params: &ReportFilterParams) -> Vec<StudentTrend> {
        degrade("student_trends", Self::trend_rows(db, params)).await
    }

    #[instrument(skip(db))]
    pub async fn attendance(db: &PgPool, params: &ReportFilterParams) -> AttendanceReport {
        let (attendance, attendance_list) = tokio::join!(
            degrade("attendance", Self::monthly_attendance(db, params)),
            degrade("attendance_list", Self::attendance_list(db, params)),
        );

        AttendanceReport {
            attendance,
            attendance_list,
        }
    }

    #[instrument(skip(db))]
    pub async fn exam_comparisons(db: &PgPool, params: &ReportFilterParams) -> Vec<ExamComparison> {
        degrade("exam_comparisons", Self::exam_rows(db, params)).await
    }

    #[instrument(skip(db))]
    pub async fn student_performance(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Vec<StudentPerformance> {
        degrade("student_performance", Self::performance_rows(db, params)).await
    }

    #[instrument(skip(db))]
    pub async fn registrations(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Vec<RegistrationReportRow> {
        degrade("registration", Self::registration_rows(db, params)).await
    }

    #[instrument(skip(db))]
    pub async fn all(db: &PgPool, params: &ReportFilterParams) -> AllReports {
        let (students, financial, academic, student_trends, attendance) = tokio::join!(
            Self::students(db, params),
            Self::financial(db, params),
            Self::academic(db, params),
            Self::student_trends(db, params),
            Self::attendance(db, params),
        );

        AllReports {
            students,
            financial,
            academic,
            student_trends,
            attendance,
        }
    }

    // -- students -----------------------------------------------------------

    async fn students_by_gender(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<GenderCounts, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT COUNT(*) FILTER (WHERE s.gender = 'M') AS male,
                   COUNT(*) FILTER (WHERE s.gender = 'F') AS female,
                   COUNT(*) AS total
            FROM registrations r
            JOIN students s ON s.student_id = r.student_id
            "#,
        );
        registration_filters(params).push_where(&mut query);
        query.build_query_as::<GenderCounts>().fetch_one(db).await
    }

    /// Every level appears, with a zero count when nobody is enrolled.
    async fn students_by_level(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<LevelCount>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT l.name AS level, l.id AS level_id, COUNT(r.id) AS count,
                   '#' || SUBSTRING(MD5(l.name), 1, 6) AS color
            FROM levels l
            LEFT JOIN registrations r ON r.level = l.id
            "#,
        );
        FilterSet::new()
            .eq("r.school_year", params.year_id.clone())
            .push_and(&mut query);
        query.push(" GROUP BY l.id, l.name ORDER BY l.id");
        query.build_query_as::<LevelCount>().fetch_all(db).await
    }

    async fn tuition_status(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<TuitionStatus, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT COUNT(*) FILTER (WHERE r.paid) AS paid,
                   COUNT(*) FILTER (WHERE NOT r.paid) AS unpaid,
                   COUNT(*) AS total
            FROM registrations r
            "#,
        );
        registration_filters(params).push_where(&mut query);
        query.build_query_as::<TuitionStatus>().fetch_one(db).await
    }

    async fn student_list(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<StudentListRow>, sqlx::Error> {
        let mut query = QueryBuilder::new(format!(
            r#"
            SELECT s.student_id, s.student_name_lao AS name, s.guardian_phone AS parent_phone,
                   TO_CHAR(s.date_of_birth, 'DD/MM/YYYY') AS dob,
                   s.village, s.district, s.province,
                   {GENDER_LABEL} AS gender,
                   s.phone_number AS phone,
                   r.level AS level_id, r.classroom AS class_id, r.school_year AS year_id
            FROM registrations r
            JOIN students s ON s.student_id = r.student_id
            "#
        ));
        registration_filters(params).push_where(&mut query);
        query.push(" ORDER BY s.student_name_lao, s.student_id");
        query.build_query_as::<StudentListRow>().fetch_all(db).await
    }

    // -- financial ----------------------------------------------------------

    async fn monthly_payments(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<MonthlyPayment>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT EXTRACT(MONTH FROM p.payment_date)::int AS month_number,
                   SUM(p.amount)::float8 AS amount
            FROM payments p
            JOIN registrations r ON r.id = p.registration_id
            "#,
        );
        registration_filters(params)
            .eq("EXTRACT(MONTH FROM p.payment_date)::int", params.month())
            .push_where(&mut query);
        query.push(" GROUP BY 1 ORDER BY 1");

        let mut rows = query.build_query_as::<MonthlyPayment>().fetch_all(db).await?;
        for row in &mut rows {
            row.month = lao_month_name(row.month_number).to_string();
        }
        Ok(rows)
    }

    async fn financial_rows(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<FinancialRow>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT EXTRACT(MONTH FROM transaction_date)::int AS month_number,
                   COALESCE(SUM(amount) FILTER (WHERE type = 'income'), 0)::float8 AS income,
                   COALESCE(SUM(amount) FILTER (WHERE type = 'expense'), 0)::float8 AS expenses,
                   SUM(CASE WHEN type = 'income' THEN amount ELSE -amount END)::float8 AS balance,
                   academic_year_id AS year_id
            FROM financial_transactions
            "#,
        );
        FilterSet::new()
            .eq("academic_year_id", params.year_id.clone())
            .eq("EXTRACT(MONTH FROM transaction_date)::int", params.month())
            .push_where(&mut query);
        query.push(" GROUP BY 1, academic_year_id ORDER BY 1, academic_year_id");

        let mut rows = query.build_query_as::<FinancialRow>().fetch_all(db).await?;
        for row in &mut rows {
            row.month = lao_month_name(row.month_number).to_string();
        }
        Ok(rows)
    }

    // -- academic -----------------------------------------------------------

    async fn class_averages(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<ClassAverage>, sqlx::Error> {
        let mut query = QueryBuilder::new(format!(
            r#"
            {REGISTRATION_SCORES}
            SELECT COALESCE(c.name, r.classroom) AS class_name, r.classroom AS class_id,
                   AVG(rs.avg_score)::float8 AS average_score
            FROM registrations r
            JOIN reg_scores rs ON rs.registration_id = r.id
            LEFT JOIN classes c ON c.id = r.classroom
            "#
        ));
        year_and_level(params).push_where(&mut query);
        query.push(" GROUP BY r.classroom, c.name ORDER BY r.classroom");
        query.build_query_as::<ClassAverage>().fetch_all(db).await
    }

    async fn grades_by_class(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<ClassGradeRow>, sqlx::Error> {
        let mut query = QueryBuilder::new(format!(
            r#"
            {REGISTRATION_SCORES}
            SELECT s.student_id, s.student_name_lao AS name,
                   COALESCE(c.name, r.classroom) AS class_name,
                   rs.avg_score::float8 AS average,
                   r.level AS level_id, r.classroom AS class_id, r.school_year AS year_id
            FROM registrations r
            JOIN students s ON s.student_id = r.student_id
            LEFT JOIN classes c ON c.id = r.classroom
            LEFT JOIN reg_scores rs ON rs.registration_id = r.id
            "#
        ));
        registration_filters(params).push_where(&mut query);
        query.push(" ORDER BY rs.avg_score DESC NULLS LAST, s.student_id");
        query.build_query_as::<ClassGradeRow>().fetch_all(db).await
    }

    async fn grades_by_level(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<LevelGradeRow>, sqlx::Error> {
        let mut query = QueryBuilder::new(format!(
            r#"
            {REGISTRATION_SCORES}
            SELECT r.classroom AS class_id, COALESCE(c.name, r.classroom) AS class_name,
                   COUNT(*) AS students,
                   COALESCE(AVG(rs.avg_score), 0)::float8 AS avg_score,
                   ROUND(COUNT(*) FILTER (WHERE rs.avg_score >= 60) * 100.0 / COUNT(*))::bigint || '%' AS pass_rate
            FROM registrations r
            LEFT JOIN classes c ON c.id = r.classroom
            LEFT JOIN reg_scores rs ON rs.registration_id = r.id
            "#
        ));
        year_and_level(params).push_where(&mut query);
        query.push(" GROUP BY r.classroom, c.name ORDER BY r.classroom");
        query.build_query_as::<LevelGradeRow>().fetch_all(db).await
    }

    // -- trends -------------------------------------------------------------

    async fn trend_rows(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<StudentTrend>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT sy.name AS year_name, sy.id AS year_id, COUNT(r.id) AS student_count
            FROM school_years sy
            LEFT JOIN registrations r ON r.school_year = sy.id
            "#,
        );
        FilterSet::new()
            .eq("r.level", params.level_id.clone())
            .push_and(&mut query);
        query.push(" GROUP BY sy.id, sy.name ORDER BY sy.id");
        query.build_query_as::<StudentTrend>().fetch_all(db).await
    }

    // -- attendance ---------------------------------------------------------

    async fn monthly_attendance(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<MonthlyAttendance>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT EXTRACT(MONTH FROM a.date)::int AS month_number,
                   (COUNT(*) FILTER (WHERE a.status = 'present') * 100.0 / COUNT(*))::float8 AS present_rate,
                   (COUNT(*) FILTER (WHERE a.status = 'absent') * 100.0 / COUNT(*))::float8 AS absent_rate,
                   COUNT(DISTINCT a.date) AS total_days
            FROM attendances a
            JOIN registrations r ON r.id = a.registration_id
            "#,
        );
        registration_filters(params)
            .eq("EXTRACT(MONTH FROM a.date)::int", params.month())
            .push_where(&mut query);
        query.push(" GROUP BY 1 ORDER BY 1");

        let mut rows = query.build_query_as::<MonthlyAttendance>().fetch_all(db).await?;
        for row in &mut rows {
            row.month = lao_month_name(row.month_number).to_string();
        }
        Ok(rows)
    }

    async fn attendance_list(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<AttendanceListRow>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT s.student_id, s.student_name_lao AS name,
                   COALESCE(c.name, r.classroom) AS class_name,
                   COALESCE(ROUND(AVG((a.status = 'present')::int * 100))::bigint, 0) || '%' AS attendance,
                   TO_CHAR(MAX(a.date) FILTER (WHERE a.status = 'absent'), 'DD/MM/YYYY') AS last_absent,
                   r.level AS level_id, r.classroom AS class_id, r.school_year AS year_id
            FROM registrations r
            JOIN students s ON s.student_id = r.student_id
            LEFT JOIN classes c ON c.id = r.classroom
            LEFT JOIN attendances a ON a.registration_id = r.id
            "#,
        );
        registration_filters(params).push_where(&mut query);
        query.push(
            " GROUP BY r.id, s.student_id, s.student_name_lao, c.name \
              ORDER BY AVG((a.status = 'present')::int) DESC NULLS LAST, s.student_id",
        );
        query.build_query_as::<AttendanceListRow>().fetch_all(db).await
    }

    // -- exams --------------------------------------------------------------

    async fn exam_rows(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<ExamComparison>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT sub.name AS subject_name, COALESCE(c.name, r.classroom) AS class_name,
                   AVG(e.score)::float8 AS average_score,
                   MAX(e.score)::float8 AS max_score,
                   MIN(e.score)::float8 AS min_score
            FROM exams e
            JOIN subjects sub ON sub.id = e.subject_id
            JOIN registrations r ON r.id = e.registration_id
            LEFT JOIN classes c ON c.id = r.classroom
            "#,
        );
        registration_filters(params).push_where(&mut query);
        query.push(" GROUP BY sub.id, sub.name, r.classroom, c.name ORDER BY sub.name, r.classroom");
        query.build_query_as::<ExamComparison>().fetch_all(db).await
    }

    /// Top students by mean exam score, each with their subject scores.
    async fn performance_rows(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<StudentPerformance>, sqlx::Error> {
        let filters = registration_filters(params);

        let mut query = QueryBuilder::new(
            r#"
            SELECT s.student_name_lao AS student_name, s.student_id,
                   AVG(e.score)::float8 AS average_score
            FROM exams e
            JOIN registrations r ON r.id = e.registration_id
            JOIN students s ON s.student_id = r.student_id
            "#,
        );
        filters.push_where(&mut query);
        query
            .push(" GROUP BY s.student_id, s.student_name_lao ORDER BY average_score DESC, s.student_id LIMIT ")
            .push_bind(params.limit());

        let mut students = query.build_query_as::<StudentPerformance>().fetch_all(db).await?;
        if students.is_empty() {
            return Ok(students);
        }

        let ids: Vec<String> = students.iter().map(|s| s.student_id.clone()).collect();
        let mut subjects_query = QueryBuilder::new(
            r#"
            SELECT r.student_id, sub.name AS subject_name, e.score
            FROM exams e
            JOIN subjects sub ON sub.id = e.subject_id
            JOIN registrations r ON r.id = e.registration_id
            WHERE r.student_id = ANY(
            "#,
        );
        subjects_query.push_bind(ids).push(")");
        filters.push_and(&mut subjects_query);
        subjects_query.push(" ORDER BY sub.name");

        let rows = subjects_query
            .build_query_as::<SubjectScoreRow>()
            .fetch_all(db)
            .await?;

        let mut by_student: HashMap<String, Vec<SubjectScore>> = HashMap::new();
        for row in rows {
            by_student.entry(row.student_id).or_default().push(SubjectScore {
                subject_name: row.subject_name,
                score: row.score,
            });
        }
        for student in &mut students {
            student.subjects = by_student.remove(&student.student_id).unwrap_or_default();
        }

        Ok(students)
    }

    // -- registrations ------------------------------------------------------

    async fn registration_rows(
        db: &PgPool,
        params: &ReportFilterParams,
    ) -> Result<Vec<RegistrationReportRow>, sqlx::Error> {
        let mut query = QueryBuilder::new(format!(
            r#"
            SELECT r.id, s.student_id AS code, s.student_name_lao AS name, s.id_number,
                   {GENDER_LABEL} AS gender,
                   COALESCE(l.name, r.level) AS level,
                   COALESCE(c.name, r.classroom) AS class_name,
                   TO_CHAR(r.registration_date, 'DD/MM/YYYY') AS reg_date,
                   r.paid,
                   r.level AS level_id, r.classroom AS class_id, r.school_year AS year_id
            FROM registrations r
            JOIN students s ON s.student_id = r.student_id
            LEFT JOIN levels l ON l.id = r.level
            LEFT JOIN classes c ON c.id = r.classroom
            "#
        ));
        registration_filters(params).push_where(&mut query);
        query.push(" ORDER BY r.registration_date DESC, r.id DESC");
        query.build_query_as::<RegistrationReportRow>().fetch_all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(year: Option<&str>, level: Option<&str>, class: Option<&str>) -> ReportFilterParams {
        ReportFilterParams {
            year_id: year.map(String::from),
            level_id: level.map(String::from),
            class_id: class.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_filters_render_nothing() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM registrations r");
        registration_filters(&params(None, None, None)).push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT 1 FROM registrations r");
    }

    #[test]
    fn test_registration_filters_bind_in_order() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM registrations r");
        registration_filters(&params(Some("2024"), None, Some("A"))).push_where(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM registrations r WHERE r.school_year = $1 AND r.classroom = $2"
        );
    }

    #[tokio::test]
    async fn test_degrade_returns_default_on_error() {
        let counts: GenderCounts =
            degrade("students_by_gender", async { Err(sqlx::Error::RowNotFound) }).await;
        assert_eq!(counts, GenderCounts::default());

        let rows: Vec<StudentTrend> = degrade("student_trends", async { Ok(Vec::new()) }).await;
        assert!(rows.is_empty());
    }
}
